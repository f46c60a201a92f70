//! # Frame Logger
//!
//! A level-gated logging facade that labels every record with the code that
//! issued it.
//!
//! ## Features
//!
//! - **Level gating**: `trace` < `debug` < `info` < `warn` < `error` < `fatal`
//! - **Caller frames**: function, file and line of the call site on each record
//! - **Request correlation**: `requestId` taken from a [`RequestContext`]
//! - **Safe arguments**: absent optionals render as `nil` or `0`
//! - **Text or JSON**: info and below on stdout, error and fatal on stderr
//!
//! ```
//! use frame_logger::prelude::*;
//! use frame_logger::info;
//!
//! let logger = Logger::builder().level_name("debug").json(true).build();
//! let ctx = new_context(&RequestContext::new(), "abc-123");
//!
//! info!(logger, ctx: &ctx, "user %s logged in", "alice");
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::ConsoleAppender;
    pub use crate::core::{
        new_context, request_id, request_id_from_headers, Appender, ArgValue, CallerFrame,
        LogArg, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, MissingRequestIdPolicy, OutputFormat, RequestContext, Result,
        StructuredRecord, TimestampFormat, ToLogArg,
    };
    pub use crate::global::get_instance;
}

pub use crate::appenders::ConsoleAppender;
pub use crate::core::{
    new_context, request_id, request_id_from_headers, resolve_caller_frame, sanitize, Appender,
    ArgKind, ArgValue, CallerFrame, FatalHandler, LogArg, LogEntry, LogLevel, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, MissingRequestIdPolicy,
    OutputFormat, RequestContext, Result, StructuredRecord, TimestampFormat, ToLogArg,
    DEFAULT_LOG_LEVEL, FATAL_EXIT_CODE, NIL, RECORD_MARKER, REQUEST_ID_FIELD, REQUEST_ID_HEADER,
    UNKNOWN_FUNCTION,
};
pub use crate::global::{get_instance, get_instance_with, instance};
