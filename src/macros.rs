//! Logging macros
//!
//! The macros capture the full caller frame (function, file, line) at the call
//! site and convert each argument with [`ToLogArg`](crate::ToLogArg), so
//! optionals can be passed directly. Arguments are not evaluated when the
//! level is disabled.
//!
//! # Examples
//!
//! ```
//! use frame_logger::prelude::*;
//! use frame_logger::{info, warn};
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With positional arguments
//! let port = 8080;
//! info!(logger, "Server listening on port %d", port);
//!
//! // Absent optionals render as sentinels
//! let user: Option<&str> = None;
//! warn!(logger, "No session for user %s", user);
//!
//! // With a request context
//! let ctx = new_context(&RequestContext::new(), "abc-123");
//! info!(logger, ctx: &ctx, "Handled %s", "/health");
//! ```

/// Log a message at the given level.
///
/// ```
/// # use frame_logger::prelude::*;
/// # let logger = Logger::new();
/// use frame_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: %d", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, ctx: $ctx:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level: $crate::LogLevel = $level;
        if logger.is_enabled(level) {
            logger.log_at(
                level,
                $crate::CallerFrame::new($crate::function_name!(), file!(), line!()),
                ::core::convert::Into::<::core::option::Option<&$crate::RequestContext>>::into($ctx),
                $template,
                &[$($crate::ToLogArg::to_log_arg(&$arg)),*],
            );
        } else {
            logger.metrics().record_filtered();
        }
    }};
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level: $crate::LogLevel = $level;
        if logger.is_enabled(level) {
            logger.log_at(
                level,
                $crate::CallerFrame::new($crate::function_name!(), file!(), line!()),
                ::core::option::Option::None,
                $template,
                &[$($crate::ToLogArg::to_log_arg(&$arg)),*],
            );
        } else {
            logger.metrics().record_filtered();
        }
    }};
}

/// Log a trace-level message.
///
/// ```
/// # use frame_logger::prelude::*;
/// # let logger = Logger::builder().min_level(LogLevel::Trace).build();
/// use frame_logger::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: %v", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use frame_logger::prelude::*;
/// # let logger = Logger::new();
/// use frame_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing %d items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use frame_logger::prelude::*;
/// # let logger = Logger::new();
/// use frame_logger::error;
/// error!(logger, "Error code: %d, message: %s", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the logger's fatal handler.
///
/// With the default handler this terminates the process.
///
/// ```no_run
/// # use frame_logger::prelude::*;
/// # let logger = Logger::new();
/// use frame_logger::fatal;
/// fatal!(logger, "Unable to recover from error: %s", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::ConsoleAppender;
    use crate::core::{new_context, Logger, LogLevel, OutputFormat, RequestContext};
    use parking_lot::Mutex;
    use std::io::{self, Write};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn records(buffer: &Buffer) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(&buffer.0.lock())
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn logger(level: LogLevel) -> (Logger, Buffer) {
        let out = Buffer::default();
        let logger = Logger::builder()
            .min_level(level)
            .appender(
                ConsoleAppender::with_writers(out.clone(), out.clone())
                    .with_output_format(OutputFormat::Json),
            )
            .on_fatal(Arc::new(|| {}))
            .build();
        (logger, out)
    }

    #[test]
    fn test_macro_captures_function_and_line() {
        let (logger, out) = logger(LogLevel::Trace);

        let line = line!() + 1;
        info!(logger, "value %d", 7);

        let record = &records(&out)[0];
        assert_eq!(record["message"], "value 7");
        assert_eq!(record["frame"]["line"], line);
        assert!(record["frame"]["function"]
            .as_str()
            .unwrap()
            .ends_with("macros::tests::test_macro_captures_function_and_line"));
        assert!(record["frame"]["file"].as_str().unwrap().ends_with("macros.rs"));
    }

    #[test]
    fn test_macro_with_context() {
        let (logger, out) = logger(LogLevel::Info);
        let ctx = new_context(&RequestContext::new(), "abc-123");

        info!(logger, ctx: &ctx, "handled %s", "/health");
        warn!(logger, ctx: Option::<&RequestContext>::None, "no context");

        let records = records(&out);
        assert_eq!(records[0]["requestId"], "abc-123");
        assert_eq!(records[0]["message"], "handled /health");
        assert!(records[1].get("requestId").is_none());
    }

    #[test]
    fn test_macro_optionals() {
        let (logger, out) = logger(LogLevel::Debug);
        let count: Option<u32> = None;
        let name: Option<String> = None;
        let ratio = Some(0.5_f64);

        debug!(logger, "count=%d name=%s ratio=%v", count, name, ratio);

        assert_eq!(records(&out)[0]["message"], "count=0 name=nil ratio=0.5");
    }

    #[test]
    fn test_disabled_macro_skips_arguments() {
        let (logger, out) = logger(LogLevel::Error);
        let mut evaluated = false;

        trace!(logger, "%s", {
            evaluated = true;
            "expensive"
        });

        assert!(!evaluated);
        assert!(records(&out).is_empty());
        assert_eq!(logger.metrics().filtered_count(), 1);
    }

    #[test]
    fn test_all_level_macros() {
        let (logger, out) = logger(LogLevel::Trace);

        trace!(logger, "t");
        debug!(logger, "d");
        info!(logger, "i");
        warn!(logger, "w");
        error!(logger, "e");
        fatal!(logger, "f");
        log!(logger, LogLevel::Info, "trailing comma %d", 1,);

        let levels: Vec<_> = records(&out)
            .iter()
            .map(|r| r["level"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            levels,
            ["trace", "debug", "info", "warn", "error", "fatal", "info"]
        );
    }
}
