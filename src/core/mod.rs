//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod frame;
pub mod log_arg;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod request_context;
pub mod structured_entry;
pub mod template;
pub mod timestamp;

pub use appender::Appender;
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use frame::{resolve_caller_frame, CallerFrame, UNKNOWN_FUNCTION};
pub use log_arg::{sanitize, ArgKind, ArgValue, LogArg, ToLogArg, NIL};
pub use log_entry::LogEntry;
pub use log_level::{LogLevel, DEFAULT_LOG_LEVEL};
pub use logger::{FatalHandler, Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use request_context::{
    new_context, request_id, request_id_from_headers, MissingRequestIdPolicy, RequestContext,
    REQUEST_ID_FIELD, REQUEST_ID_HEADER,
};
pub use structured_entry::{StructuredRecord, RECORD_MARKER};
pub use timestamp::TimestampFormat;
