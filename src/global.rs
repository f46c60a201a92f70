//! Process-wide logger instance
//!
//! Prefer building a [`Logger`] and passing it around. The global instance
//! exists for code that cannot thread one through: the first call to
//! [`get_instance`] configures it, every later call gets the same logger back
//! and its arguments are ignored with a warning.

use crate::core::{Logger, LoggerBuilder, LoggerConfig, ToLogArg};
use std::sync::OnceLock;

static INSTANCE: OnceLock<Logger> = OnceLock::new();

/// Return the global logger, creating it on first use.
///
/// `level_name` is parsed case-insensitively; unknown names fall back to
/// `warn`. Racing first calls construct exactly one logger.
///
/// ```
/// use frame_logger::{get_instance, LogLevel};
///
/// let logger = get_instance("info", false);
/// assert!(std::ptr::eq(logger, get_instance("trace", true)));
/// assert_eq!(logger.level(), LogLevel::Info);
/// ```
#[track_caller]
pub fn get_instance(level_name: &str, json: bool) -> &'static Logger {
    get_instance_with(&LoggerConfig::new(level_name, json), |builder| builder)
}

/// Like [`get_instance`], with full settings and a hook to adjust the builder
/// (appender, fatal handler) before the first logger is built.
///
/// `customize` only runs when this call creates the instance.
#[track_caller]
pub fn get_instance_with(
    config: &LoggerConfig,
    customize: impl FnOnce(LoggerBuilder) -> LoggerBuilder,
) -> &'static Logger {
    let mut created = false;
    let logger = INSTANCE.get_or_init(|| {
        created = true;
        customize(LoggerBuilder::from_config(config)).build()
    });

    if !created {
        logger.warn(
            None,
            "The instance already exists. Will ignore passed log level [%s]. Returning logger instance with logLevel [%s].",
            &[config.level.to_log_arg(), logger.level().to_str().to_log_arg()],
        );
    }

    logger
}

/// The global logger, if [`get_instance`] has been called
pub fn instance() -> Option<&'static Logger> {
    INSTANCE.get()
}
