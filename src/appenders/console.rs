//! Console appender implementation

use crate::core::output_format::format_text;
use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

type Stream = Box<dyn Write + Send>;

/// Writes trace/debug/info/warn records to stdout and error/fatal to stderr.
pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
    out: Stream,
    err: Stream,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Route the two streams to other writers; colors are turned off
    ///
    /// # Example
    ///
    /// ```
    /// use frame_logger::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::with_writers(Vec::new(), std::io::sink());
    /// ```
    pub fn with_writers<O, E>(out: O, err: E) -> Self
    where
        O: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        Self {
            use_colors: false,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
            out: Box::new(out),
            err: Box::new(err),
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use frame_logger::{ConsoleAppender, OutputFormat};
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, entry: &LogEntry) -> Result<String> {
        match self.output_format {
            OutputFormat::Text if self.use_colors => Ok(self.format_colored(entry)),
            format => format.format(entry, &self.timestamp_format),
        }
    }

    #[cfg(feature = "console")]
    fn format_colored(&self, entry: &LogEntry) -> String {
        let label = format!("{:5}", entry.level.label())
            .color(entry.level.color_code())
            .to_string();
        format_text(entry, &self.timestamp_format, &label)
    }

    #[cfg(not(feature = "console"))]
    fn format_colored(&self, entry: &LogEntry) -> String {
        format_text(entry, &self.timestamp_format, entry.level.label())
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.render(entry)?;

        let stream = if entry.level.is_error_stream() {
            &mut self.err
        } else {
            &mut self.out
        };
        writeln!(stream, "{}", output)?;
        stream.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        self.err.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
