//! # Object Scanner
//!
//! Recovers top-level JSON objects from an unframed text stream, such as the
//! output of a tool that prints pretty-printed objects back-to-back:
//!
//! ```text
//! {
//!   "type": "cpu",
//!   "load": 0.4
//! }{"type": "mem"}
//! {"type": "net"}
//! ```
//!
//! Each object is yielded as soon as its closing brace arrives. Objects whose
//! braces balance but which `serde_json` rejects are discarded and reported to
//! a [`DiagnosticSink`]; scanning then carries on with the next character.
//!
//! ```
//! let types: Vec<String> = jsonscan::scan_str(r#"{"type":"a"} {"type":"b"}"#)
//!     .map(|object| object["type"].as_str().unwrap_or_default().to_string())
//!     .collect();
//! assert_eq!(types, ["a", "b"]);
//! ```
pub mod fragments;
pub mod state;

use log::{debug, trace};
use serde::Deserialize as _;
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::io::BufRead;
use std::iter::FusedIterator;

use crate::diagnostics::{DecodeError, DiagnosticSink, StderrSink};

// Re-exports
pub use fragments::Fragments;
pub use state::ScanState;

/// A decoded top-level object, keys in the order they appeared.
pub type JsonObject = Map<String, Value>;

/// Running totals for one scan session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Objects yielded to the consumer
    pub objects: usize,
    /// Candidates discarded as undecodable
    pub decode_errors: usize,
}

/// Pull iterator over the JSON objects in a stream of text fragments.
///
/// `I` yields `Result<T, E>` where `T: AsRef<str>` is a fragment of arbitrary
/// length; fragment boundaries carry no meaning. Errors from `I` are passed
/// through unchanged, and scanning can continue if the consumer keeps pulling.
///
/// Text left unresolved when `I` runs out (an object missing its closing
/// brace) is dropped without a diagnostic. [`ObjectScanner::pending`] exposes
/// it.
#[derive(Debug)]
pub struct ObjectScanner<I, S = StderrSink> {
    /// Source of text fragments
    fragments: I,
    /// Fragment currently being consumed
    line: String,
    /// Byte offset of the next unread character in `line`
    cursor: usize,
    state: ScanState,
    sink: S,
    stats: ScanStats,
    /// Set once `fragments` has returned `None`
    exhausted: bool,
}

impl<I> ObjectScanner<I> {
    /// Creates a scanner that reports decode failures to standard error.
    pub fn new<F>(fragments: F) -> Self
    where
        F: IntoIterator<IntoIter = I>,
    {
        Self::with_sink(fragments, StderrSink)
    }
}

impl<I, S> ObjectScanner<I, S> {
    /// Creates a scanner that reports decode failures to `sink`.
    pub fn with_sink<F>(fragments: F, sink: S) -> Self
    where
        F: IntoIterator<IntoIter = I>,
    {
        Self {
            fragments: fragments.into_iter(),
            line: String::new(),
            cursor: 0,
            state: ScanState::new(),
            sink,
            stats: ScanStats::default(),
            exhausted: false,
        }
    }

    /// Totals so far.
    pub const fn stats(&self) -> ScanStats {
        self.stats
    }

    /// The partially assembled object, if any. Once the scanner is exhausted
    /// this is the trailing text that will never be emitted.
    pub fn pending(&self) -> Option<&str> {
        self.state.has_pending().then(|| self.state.buffer())
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the scanner, returning its diagnostic sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<I, T, E, S> ObjectScanner<I, S>
where
    I: Iterator<Item = Result<T, E>>,
    T: AsRef<str>,
    S: DiagnosticSink,
{
    /// Parses a candidate handed back by the state machine. Failures go to
    /// the sink and yield `None`.
    fn decode(&mut self, candidate: String) -> Option<JsonObject> {
        trace!("candidate of {} bytes", candidate.len());
        match parse_object(&candidate) {
            Ok(object) => {
                self.stats.objects += 1;
                debug!(
                    "object #{} decoded with {} keys",
                    self.stats.objects,
                    object.len()
                );
                Some(object)
            }
            Err(err) => {
                self.stats.decode_errors += 1;
                debug!("discarding undecodable text: {candidate:?}");
                self.sink.report(DecodeError::new(candidate, err));
                None
            }
        }
    }

    fn finish(&mut self) {
        self.exhausted = true;
        if let Some(rest) = self.pending() {
            debug!(
                "stream ended inside an object at depth {}; dropping {} bytes",
                self.state.depth(),
                rest.len()
            );
        }
    }
}

impl<I, T, E, S> Iterator for ObjectScanner<I, S>
where
    I: Iterator<Item = Result<T, E>>,
    T: AsRef<str>,
    S: DiagnosticSink,
{
    type Item = Result<JsonObject, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        loop {
            // Drain whatever is left of the current fragment first.
            loop {
                let Some(c) = self.line[self.cursor..].chars().next() else {
                    break;
                };
                self.cursor += c.len_utf8();
                if let Some(candidate) = self.state.push(c)
                    && let Some(object) = self.decode(candidate)
                {
                    return Some(Ok(object));
                }
            }

            match self.fragments.next() {
                Some(Ok(fragment)) => {
                    self.line.clear();
                    self.line.push_str(fragment.as_ref());
                    self.cursor = 0;
                }
                Some(Err(err)) => return Some(Err(err)),
                None => {
                    self.finish();
                    return None;
                }
            }
        }
    }
}

impl<I, T, E, S> FusedIterator for ObjectScanner<I, S>
where
    I: Iterator<Item = Result<T, E>>,
    T: AsRef<str>,
    S: DiagnosticSink,
{
}

/// Parses one complete object with no nesting limit. Deep input grows the
/// stack on the heap instead of overflowing it.
fn parse_object(text: &str) -> serde_json::Result<JsonObject> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let object =
        JsonObject::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(object)
}

/// Scans an in-memory string. Decode failures go to standard error.
pub fn scan_str(
    input: &str,
) -> impl Iterator<Item = JsonObject> + FusedIterator + '_ {
    ObjectScanner::new(std::iter::once(Ok::<_, Infallible>(input)))
        .map(|item| item.unwrap_or_else(|never| match never {}))
}

/// Scans a reader line by line. Read errors are yielded as `Err`.
pub fn scan_reader<R: BufRead>(reader: R) -> ObjectScanner<Fragments<R>> {
    ObjectScanner::new(Fragments::new(reader))
}
