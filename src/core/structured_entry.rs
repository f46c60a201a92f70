//! JSON record shape

use super::frame::CallerFrame;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Origin marker attached to every JSON record
pub const RECORD_MARKER: [&str; 2] = ["sourcecode", "rust"];

/// One JSON record, as written to the output stream
///
/// The field set is fixed for a given configuration; `requestId` is the only
/// optional key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    #[serde(rename = "@marker")]
    pub marker: Vec<String>,

    /// Timestamp, RFC 3339 unless configured otherwise
    pub date: String,

    pub level: LogLevel,

    pub message: String,

    pub frame: CallerFrame,

    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none", default)]
    pub request_id: Option<String>,
}

impl StructuredRecord {
    pub fn from_entry(entry: &LogEntry, timestamp_format: &TimestampFormat) -> Self {
        Self {
            marker: RECORD_MARKER.iter().map(|m| m.to_string()).collect(),
            date: timestamp_format.format(&entry.timestamp),
            level: entry.level,
            message: entry.message.clone(),
            frame: entry.frame.clone(),
            request_id: entry.request_id.clone(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
