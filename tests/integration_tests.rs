//! Integration tests for frame_logger
//!
//! These tests exercise the public API end to end through in-memory streams.

mod common;

use common::{capture_logger, SharedBuffer};
use frame_logger::prelude::*;
use frame_logger::{debug, error, fatal, info, log, trace, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_threshold_gates_every_level() {
    for threshold in LogLevel::ALL {
        let (logger, out, err) = capture_logger(threshold, OutputFormat::Json);

        for level in LogLevel::ALL {
            log!(logger, level, "at %s", level.to_str());
        }

        let emitted: Vec<String> = out
            .records()
            .into_iter()
            .chain(err.records())
            .map(|r| r["level"].as_str().expect("level is a string").to_string())
            .collect();
        let expected: Vec<&str> = LogLevel::ALL
            .iter()
            .filter(|level| **level >= threshold)
            .map(|level| level.to_str())
            .collect();

        assert_eq!(emitted, expected, "threshold {}", threshold);
    }
}

#[test]
fn test_streams_split_by_severity() {
    let (logger, out, err) = capture_logger(LogLevel::Trace, OutputFormat::Text);

    trace!(logger, "t");
    debug!(logger, "d");
    info!(logger, "i");
    warn!(logger, "w");
    error!(logger, "e");
    fatal!(logger, "f");

    let out_lines = out.lines();
    let err_lines = err.lines();
    assert_eq!(out_lines.len(), 4);
    assert_eq!(err_lines.len(), 2);
    assert!(out_lines[0].contains("[TRACE]"));
    assert!(out_lines[3].contains("[WARN ]"));
    assert!(err_lines[0].contains("[ERROR]"));
    assert!(err_lines[1].contains("[FATAL]"));
}

#[test]
fn test_json_records_decode_at_every_severity() {
    let (logger, out, err) = capture_logger(LogLevel::Trace, OutputFormat::Json);

    for level in LogLevel::ALL {
        log!(logger, level, "record %d", level as u8);
    }

    let lines: Vec<String> = out.lines().into_iter().chain(err.lines()).collect();
    assert_eq!(lines.len(), 6);

    for (line, level) in lines.iter().zip(LogLevel::ALL) {
        let record = StructuredRecord::from_json(line).expect("Failed to decode record");
        assert_eq!(record.level, level);
        assert_eq!(record.message, format!("record {}", level as u8));
        assert_eq!(record.marker, vec!["sourcecode", "rust"]);
        assert!(!record.date.is_empty());
        assert!(record.frame.file.ends_with("integration_tests.rs"));
        assert!(record.request_id.is_none());
    }
}

#[test]
fn test_request_id_correlation() {
    let (logger, out, _) = capture_logger(LogLevel::Info, OutputFormat::Json);
    let ctx = new_context(&RequestContext::new(), "abc-123");

    info!(logger, ctx: &ctx, "with id");
    info!(logger, ctx: &RequestContext::new(), "empty context");
    info!(logger, "no context");

    let records = out.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["requestId"], "abc-123");
    assert!(records[1].get("requestId").is_none());
    assert!(records[2].get("requestId").is_none());
}

#[test]
fn test_request_id_in_text_output() {
    let (logger, out, _) = capture_logger(LogLevel::Info, OutputFormat::Text);
    let ctx = new_context(&RequestContext::new(), "abc-123");

    logger.info(Some(&ctx), "handled", &[]);

    assert!(out.lines()[0].ends_with("requestId=abc-123"));
}

#[test]
fn test_request_id_from_headers_feeds_context() {
    let mut headers = http::HeaderMap::new();
    headers.insert(frame_logger::REQUEST_ID_HEADER, http::HeaderValue::from_static("req-42"));

    let id = request_id_from_headers(&headers).expect("header present");
    let ctx = new_context(&RequestContext::new(), id);
    let (logger, out, _) = capture_logger(LogLevel::Info, OutputFormat::Json);

    info!(logger, ctx: &ctx, "from header");

    assert_eq!(out.records()[0]["requestId"], "req-42");
}

#[test]
fn test_drop_policy_discards_uncorrelated_records() {
    let out = SharedBuffer::default();
    let logger = Logger::builder()
        .appender(
            ConsoleAppender::with_writers(out.clone(), std::io::sink())
                .with_output_format(OutputFormat::Json),
        )
        .missing_request_id(MissingRequestIdPolicy::Drop)
        .build();
    let ctx = new_context(&RequestContext::new(), "abc-123");

    info!(logger, ctx: &RequestContext::new(), "dropped");
    info!(logger, ctx: &ctx, "kept with id");
    info!(logger, "kept without context");

    let messages: Vec<_> = out
        .records()
        .iter()
        .map(|r| r["message"].as_str().expect("message is a string").to_string())
        .collect();
    assert_eq!(messages, ["kept with id", "kept without context"]);
    assert_eq!(logger.metrics().dropped_count(), 1);
}

#[test]
fn test_absent_arguments_render_sentinels() {
    let (logger, out, _) = capture_logger(LogLevel::Trace, OutputFormat::Json);
    let count: Option<i64> = None;
    let ratio: Option<f64> = None;
    let name: Option<&str> = None;
    let flag: Option<bool> = None;
    let present = Some(String::from("alice"));
    let boxed = Box::new(7_u16);

    trace!(
        logger,
        "count=%d ratio=%v name=%s flag=%v present=%s boxed=%d",
        count,
        ratio,
        name,
        flag,
        present,
        boxed
    );

    assert_eq!(
        out.records()[0]["message"],
        "count=0 ratio=0 name=nil flag=nil present=alice boxed=7"
    );
}

#[test]
fn test_template_mismatches_are_marked() {
    let (logger, out, _) = capture_logger(LogLevel::Info, OutputFormat::Json);

    info!(logger, "missing %d");
    info!(logger, "extra", "a", 1);
    info!(logger, "wrong %d", "abc");

    let messages: Vec<_> = out
        .records()
        .iter()
        .map(|r| r["message"].as_str().expect("message is a string").to_string())
        .collect();
    assert_eq!(
        messages,
        [
            "missing %!d(MISSING)",
            "extra%!(EXTRA string=a, int=1)",
            "wrong %!d(string=abc)",
        ]
    );
}

#[test]
fn test_macro_frame_names_enclosing_function() {
    let (logger, out, _) = capture_logger(LogLevel::Info, OutputFormat::Json);

    let line = line!() + 1;
    info!(logger, "where am I");

    let record = &out.records()[0];
    assert_eq!(record["frame"]["line"], line);
    assert!(record["frame"]["function"]
        .as_str()
        .expect("function is a string")
        .ends_with("test_macro_frame_names_enclosing_function"));
    assert!(record["frame"]["file"]
        .as_str()
        .expect("file is a string")
        .ends_with("integration_tests.rs"));
}

#[test]
fn test_frame_inside_closure_names_enclosing_function() {
    let (logger, out, _) = capture_logger(LogLevel::Info, OutputFormat::Json);

    let run = || info!(logger, "from closure");
    run();

    let function = out.records()[0]["frame"]["function"]
        .as_str()
        .expect("function is a string")
        .to_string();
    assert!(function.ends_with("test_frame_inside_closure_names_enclosing_function"));
}

#[test]
fn test_method_call_frame_names_calling_function() {
    let (logger, out, _) = capture_logger(LogLevel::Info, OutputFormat::Json);

    let line = line!() + 1;
    logger.info(None, "plain method", &[]);

    let record = &out.records()[0];
    assert_eq!(record["frame"]["line"], line);
    let function = record["frame"]["function"]
        .as_str()
        .expect("function is a string");
    assert!(
        function.ends_with("test_method_call_frame_names_calling_function"),
        "{}",
        function
    );
}

#[test]
fn test_fatal_handler_runs_once_per_fatal_record() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let err = SharedBuffer::default();
    let logger = Logger::builder()
        .appender(ConsoleAppender::with_writers(std::io::sink(), err.clone()))
        .on_fatal(Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }))
        .build();

    error!(logger, "not fatal");
    fatal!(logger, "fatal %s", "one");
    fatal!(logger, "fatal %s", "two");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(err.lines().len(), 3);
}

#[test]
fn test_failing_appender_does_not_reach_caller() {
    struct ClosedAppender;

    impl Appender for ClosedAppender {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            Err(LoggerError::writer("stream closed"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "closed"
        }
    }

    let logger = Logger::builder().appender(ClosedAppender).build();

    info!(logger, "lost %d", 1);
    error!(logger, "lost %d", 2);

    assert_eq!(logger.metrics().write_failures(), 2);
    assert_eq!(logger.metrics().total_logged(), 0);
}

#[test]
fn test_logger_from_config() {
    let config: LoggerConfig = serde_json::from_str(
        r#"{"level": "DEBUG", "json": true, "missing_request_id": "drop"}"#,
    )
    .expect("Failed to parse config");
    let logger = Logger::from_config(&config);

    assert_eq!(logger.level(), LogLevel::Debug);
    assert_eq!(logger.missing_request_id_policy(), MissingRequestIdPolicy::Drop);
}
