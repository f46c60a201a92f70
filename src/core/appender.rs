//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// Destination for log records.
///
/// The logger holds its appender behind a mutex, so `append` and `flush` for
/// one record run as a single critical section.
pub trait Appender: Send {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
