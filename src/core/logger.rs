//! Main logger implementation
//!
//! A [`Logger`] gates every call on its level threshold before doing any
//! work. Enabled calls sanitize their arguments, render the message template,
//! attach the caller frame and request id, and hand the entry to the
//! appender. Selecting the stream and writing the record happen under one
//! lock, so records from concurrent callers never interleave.
//!
//! Fatal records terminate the process once written. This is the only path
//! in the logger that does not return to the caller.

use super::{
    appender::Appender,
    config::LoggerConfig,
    error::{LoggerError, Result},
    frame::{resolve_caller_frame, CallerFrame},
    log_arg::{sanitize, LogArg, ToLogArg},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    request_context::{request_id, MissingRequestIdPolicy, RequestContext},
    template,
    timestamp::TimestampFormat,
};
use crate::appenders::ConsoleAppender;
use parking_lot::Mutex;
use std::sync::Arc;

/// Exit status used by the default fatal handler
pub const FATAL_EXIT_CODE: i32 = 1;

/// Invoked after a fatal record has been written and flushed
pub type FatalHandler = Arc<dyn Fn() + Send + Sync>;

fn exit_process() {
    std::process::exit(FATAL_EXIT_CODE)
}

pub struct Logger {
    min_level: LogLevel,
    appender: Mutex<Box<dyn Appender>>,
    missing_request_id: MissingRequestIdPolicy,
    /// Metrics for observability (logged, filtered, dropped, failed writes)
    metrics: LoggerMetrics,
    on_fatal: FatalHandler,
}

impl Logger {
    /// Info-level logger writing text to stdout/stderr
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Build a logger from declarative settings
    ///
    /// An unrecognized level name falls back to `warn` and an unusable
    /// timestamp pattern to RFC 3339; each fallback is reported through the
    /// new logger itself.
    #[track_caller]
    pub fn from_config(config: &LoggerConfig) -> Self {
        LoggerBuilder::from_config(config).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use frame_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .output_format(OutputFormat::Json)
    ///     .build();
    /// assert!(logger.is_enabled(LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Configured threshold
    #[inline]
    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    /// Whether a record at `level` would be emitted.
    ///
    /// Use it to skip building expensive arguments.
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Logger metrics
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn missing_request_id_policy(&self) -> MissingRequestIdPolicy {
        self.missing_request_id
    }

    /// Log `template` at `level`, attributing the record to the caller.
    ///
    /// The caller's function name is looked up from the stack once per call
    /// site; the logging macros capture it at compile time instead.
    #[track_caller]
    pub fn log(
        &self,
        level: LogLevel,
        ctx: Option<&RequestContext>,
        template: &str,
        args: &[LogArg],
    ) {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let frame = resolve_caller_frame(None);
        self.emit(level, frame, ctx, template, args);
    }

    /// Log with an already resolved caller frame. Used by the logging macros.
    pub fn log_at(
        &self,
        level: LogLevel,
        frame: CallerFrame,
        ctx: Option<&RequestContext>,
        template: &str,
        args: &[LogArg],
    ) {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        self.emit(level, frame, ctx, template, args);
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, ctx: Option<&RequestContext>, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Trace, ctx, template, args);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, ctx: Option<&RequestContext>, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Debug, ctx, template, args);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, ctx: Option<&RequestContext>, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Info, ctx, template, args);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, ctx: Option<&RequestContext>, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Warn, ctx, template, args);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, ctx: Option<&RequestContext>, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Error, ctx, template, args);
    }

    /// Log at fatal level, then run the fatal handler.
    ///
    /// With the default handler the process exits with status
    /// [`FATAL_EXIT_CODE`] and this call never returns. The handler runs even
    /// when the record itself was dropped by the request id policy.
    #[inline]
    #[track_caller]
    pub fn fatal(&self, ctx: Option<&RequestContext>, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Fatal, ctx, template, args);
    }

    pub fn flush(&self) -> Result<()> {
        self.appender.lock().flush()
    }

    fn emit(
        &self,
        level: LogLevel,
        frame: CallerFrame,
        ctx: Option<&RequestContext>,
        template: &str,
        args: &[LogArg],
    ) {
        let request_id = request_id(ctx);
        let dropped = ctx.is_some()
            && request_id.is_none()
            && self.missing_request_id == MissingRequestIdPolicy::Drop;

        if dropped {
            self.metrics.record_dropped();
        } else {
            let message = template::render(template, &sanitize(args));
            let mut entry = LogEntry::new(level, message, frame);
            if let Some(id) = request_id {
                entry = entry.with_request_id(id);
            }
            self.write(&entry);
        }

        if level == LogLevel::Fatal {
            if let Err(e) = self.flush() {
                eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
            }
            (self.on_fatal)();
        }
    }

    /// Write one entry with panic isolation; failures are reported, never raised
    fn write(&self, entry: &LogEntry) {
        let mut appender = self.appender.lock();
        let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            appender.append(entry)
        }));

        match append_result {
            Ok(Ok(())) => {
                self.metrics.record_logged();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                self.metrics.record_write_failure();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked: {}",
                    appender.name(),
                    panic_msg
                );
                self.metrics.record_write_failure();
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.appender.get_mut().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use frame_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .level_name("debug")
///     .json(true)
///     .missing_request_id(MissingRequestIdPolicy::Drop)
///     .on_fatal(Arc::new(|| eprintln!("fatal record written")))
///     .build();
/// assert_eq!(logger.level(), LogLevel::Debug);
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    level_error: Option<(String, LoggerError)>,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    use_colors: bool,
    appender: Option<Box<dyn Appender>>,
    missing_request_id: MissingRequestIdPolicy,
    on_fatal: Option<FatalHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            level_error: None,
            output_format: OutputFormat::Text,
            timestamp_format: TimestampFormat::default(),
            use_colors: true,
            appender: None,
            missing_request_id: MissingRequestIdPolicy::default(),
            on_fatal: None,
        }
    }

    /// Builder preloaded with declarative settings
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::new()
            .level_name(&config.level)
            .json(config.json)
            .colors(config.colors)
            .timestamp_format(config.timestamp_format.clone())
            .missing_request_id(config.missing_request_id)
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self.level_error = None;
        self
    }

    /// Set minimum log level by name; unknown names fall back to `warn`
    #[must_use = "builder methods return a new value"]
    pub fn level_name(mut self, name: &str) -> Self {
        let (level, error) = LogLevel::parse_or_default(name);
        self.min_level = level;
        self.level_error = error.map(|e| (name.to_string(), e));
        self
    }

    /// Output format of the default console appender
    #[must_use = "builder methods return a new value"]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Shorthand for `output_format(Json)` / `output_format(Text)`
    #[must_use = "builder methods return a new value"]
    pub fn json(self, json: bool) -> Self {
        self.output_format(OutputFormat::from_json_flag(json))
    }

    /// Timestamp format of the default console appender; an invalid custom
    /// pattern falls back to RFC 3339 when the logger is built
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Colored level labels in text output of the default console appender
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Replace the default console appender.
    ///
    /// The appender owns its formatting, so `output_format`, `colors` and
    /// `timestamp_format` no longer apply.
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn missing_request_id(mut self, policy: MissingRequestIdPolicy) -> Self {
        self.missing_request_id = policy;
        self
    }

    /// Replace the fatal handler (default: exit with [`FATAL_EXIT_CODE`])
    #[must_use = "builder methods return a new value"]
    pub fn on_fatal(mut self, handler: FatalHandler) -> Self {
        self.on_fatal = Some(handler);
        self
    }

    /// Build the Logger
    #[track_caller]
    pub fn build(self) -> Logger {
        let mut timestamp_error = None;
        let appender: Box<dyn Appender> = match self.appender {
            Some(appender) => appender,
            None => {
                let timestamp_format = match self.timestamp_format.validate() {
                    Ok(()) => self.timestamp_format,
                    Err(e) => {
                        timestamp_error = Some(e);
                        TimestampFormat::default()
                    }
                };
                Box::new(
                    ConsoleAppender::with_colors(self.use_colors)
                        .with_output_format(self.output_format)
                        .with_timestamp_format(timestamp_format),
                )
            }
        };

        let logger = Logger {
            min_level: self.min_level,
            appender: Mutex::new(appender),
            missing_request_id: self.missing_request_id,
            metrics: LoggerMetrics::new(),
            on_fatal: self.on_fatal.unwrap_or_else(|| Arc::new(exit_process)),
        };

        if let Some((name, error)) = self.level_error {
            logger.warn(
                None,
                "Cannot set log level [%s] (%s), will fall back to default level [%s]",
                &[
                    name.to_log_arg(),
                    error.to_string().to_log_arg(),
                    logger.level().to_str().to_log_arg(),
                ],
            );
        }

        if let Some(error) = timestamp_error {
            logger.warn(
                None,
                "Cannot use timestamp format (%s), will fall back to [rfc3339]",
                &[error.to_string().to_log_arg()],
            );
        }

        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
