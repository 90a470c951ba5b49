//! Scoped streaming log accumulator

use super::level::Level;
use super::logger::Logger;
use std::fmt;

/// A scoped accumulator returned by [`Logger::stream`].
///
/// Values appended through [`value`](Self::value) or `write!` are
/// collected into a message that is enqueued exactly once, either on an
/// explicit [`finish`](Self::finish) or when the accumulator goes out
/// of scope, whichever comes first. The level filter is evaluated at
/// that point, and nothing that happens during finalization can reach
/// the caller as an error or panic.
#[must_use = "the accumulated message is enqueued when the stream is finished or dropped"]
pub struct LogStream<'a> {
    logger: &'a Logger,
    file_name: String,
    level: Level,
    source_file: String,
    source_line: u32,
    source_function: String,
    message: Option<String>,
}

impl<'a> LogStream<'a> {
    pub(crate) fn new(
        logger: &'a Logger,
        file_name: &str,
        level: Level,
        source_file: &str,
        source_line: u32,
        source_function: &str,
    ) -> Self {
        Self {
            logger,
            file_name: file_name.to_string(),
            level,
            source_file: source_file.to_string(),
            source_line,
            source_function: source_function.to_string(),
            message: Some(String::new()),
        }
    }

    /// Append a value to the message, chainable.
    pub fn value(mut self, value: impl fmt::Display) -> Self {
        if let Some(message) = self.message.as_mut() {
            let _ = fmt::Write::write_fmt(message, format_args!("{}", value));
        }
        self
    }

    /// Enqueue the accumulated message now instead of at scope exit.
    pub fn finish(mut self) {
        self.flush_once();
    }

    fn flush_once(&mut self) {
        if let Some(message) = self.message.take() {
            if self.logger.should_log(self.level) {
                self.logger.enqueue(
                    &self.file_name,
                    self.level,
                    &self.source_file,
                    self.source_line,
                    &self.source_function,
                    message,
                );
            }
        }
    }
}

impl fmt::Write for LogStream<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(message) = self.message.as_mut() {
            message.push_str(s);
        }
        Ok(())
    }
}

impl Drop for LogStream<'_> {
    fn drop(&mut self) {
        self.flush_once();
    }
}
