//! Output format configuration for log entries
//!
//! - Text: Human-readable format (default)
//! - Json: One JSON object per line, see [`StructuredRecord`]

use super::error::Result;
use super::log_entry::LogEntry;
use super::request_context::REQUEST_ID_FIELD;
use super::structured_entry::StructuredRecord;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45Z] [INFO ] app::handler (src/handler.rs:27) - Request processed`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"@marker":["sourcecode","rust"],"date":"2025-01-08T10:30:45Z","level":"info",...}`
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(format_text(entry, timestamp_format, entry.level.label())),
            OutputFormat::Json => {
                Ok(StructuredRecord::from_entry(entry, timestamp_format).to_json()?)
            }
        }
    }
}

/// Human-readable line with a caller-supplied (possibly colored) level label
pub(crate) fn format_text(
    entry: &LogEntry,
    timestamp_format: &TimestampFormat,
    level_label: &str,
) -> String {
    let base = format!(
        "[{}] [{:5}] {} - {}",
        timestamp_format.format(&entry.timestamp),
        level_label,
        entry.frame,
        entry.message
    );

    match entry.request_id {
        Some(ref id) => format!("{} {}={}", base, REQUEST_ID_FIELD, id),
        None => base,
    }
}
