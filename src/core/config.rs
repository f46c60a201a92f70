//! Declarative logger configuration

use super::log_level::LogLevel;
use super::request_context::MissingRequestIdPolicy;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Settings a [`Logger`](super::Logger) can be built from.
///
/// Deserializes from any serde format; every field has a default.
///
/// ```
/// use frame_logger::{LoggerConfig, MissingRequestIdPolicy};
///
/// let config: LoggerConfig =
///     serde_json::from_str(r#"{"level":"debug","json":true,"missing_request_id":"drop"}"#)
///         .unwrap();
/// assert!(config.json);
/// assert_eq!(config.missing_request_id, MissingRequestIdPolicy::Drop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Level name, case-insensitive; unknown names fall back to `warn`
    pub level: String,

    /// Structured JSON output instead of text
    pub json: bool,

    /// Colored level labels in text output
    pub colors: bool,

    pub timestamp_format: TimestampFormat,

    pub missing_request_id: MissingRequestIdPolicy,
}

impl LoggerConfig {
    pub fn new(level: impl Into<String>, json: bool) -> Self {
        Self {
            level: level.into(),
            json,
            ..Self::default()
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info.to_str().to_string(),
            json: false,
            colors: true,
            timestamp_format: TimestampFormat::default(),
            missing_request_id: MissingRequestIdPolicy::default(),
        }
    }
}
