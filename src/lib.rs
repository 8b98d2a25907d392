/*!
# `jsonscan` Library

Recovers JSON objects from streams that concatenate them with no framing,
pretty-printed or not, handing each one out as soon as its closing brace has
been read.
*/

pub mod diagnostics;
pub mod scanner;
pub mod utils;

// Re-exports
pub use diagnostics::{DecodeError, DiagnosticSink, LogSink, StderrSink};
pub use scanner::{
    Fragments, JsonObject, ObjectScanner, ScanState, ScanStats, scan_reader,
    scan_str,
};
