/*!
# Diagnostics

Decode failures are recovered inside the scanner and never reach the value
sequence. They are reported here instead, one at a time, through a
[`DiagnosticSink`].
*/
use std::io::{self, Write};
use thiserror::Error;

/// Prefix of every diagnostic line.
pub const DECODE_ERROR_PREFIX: &str = "JSON decode error: ";

/// Brace-balanced text that the JSON parser rejected.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct DecodeError {
    /// The discarded candidate text
    text: String,
    #[source]
    source: serde_json::Error,
}

impl DecodeError {
    pub(crate) const fn new(text: String, source: serde_json::Error) -> Self {
        Self { text, source }
    }

    /// The candidate text that failed to parse, as it appeared in the stream.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line of the failure, relative to the candidate text (1-based).
    #[must_use]
    pub fn line(&self) -> usize {
        self.source.line()
    }

    /// Column of the failure, relative to the candidate text (1-based).
    #[must_use]
    pub fn column(&self) -> usize {
        self.source.column()
    }

    /// The single line written to a diagnostic channel for this failure.
    #[must_use]
    pub fn diagnostic_line(&self) -> String {
        format!("{DECODE_ERROR_PREFIX}{self}")
    }
}

/// Receiver for decode failures.
pub trait DiagnosticSink {
    /// Called once for every discarded candidate, which is handed over by
    /// value.
    fn report(&mut self, error: DecodeError);
}

/// Writes one line per failure to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&mut self, error: DecodeError) {
        // Nothing sensible to do if stderr itself is gone.
        let _ = writeln!(io::stderr().lock(), "{}", error.diagnostic_line());
    }
}

/// Routes failures through the `log` facade at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, error: DecodeError) {
        log::warn!("{}", error.diagnostic_line());
    }
}

/// Collects failures for later inspection.
impl DiagnosticSink for Vec<DecodeError> {
    fn report(&mut self, error: DecodeError) {
        self.push(error);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, error: DecodeError) {
        (**self).report(error);
    }
}
