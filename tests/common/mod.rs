//! Shared helpers for integration tests

#![allow(dead_code)]

use frame_logger::prelude::*;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Clonable in-memory writer standing in for stdout/stderr
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("record is valid JSON"))
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Logger writing JSON into two buffers; the fatal handler is a no-op
pub fn capture_logger(level: LogLevel, format: OutputFormat) -> (Logger, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let logger = Logger::builder()
        .min_level(level)
        .appender(ConsoleAppender::with_writers(out.clone(), err.clone()).with_output_format(format))
        .on_fatal(Arc::new(|| {}))
        .build();
    (logger, out, err)
}
