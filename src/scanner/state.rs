//! # Scan State
//!
//! The per-character state machine that finds where one top-level JSON object
//! ends inside an unframed stream. It never parses JSON itself: it only tracks
//! brace nesting outside of string literals and hands back the accumulated
//! text once the nesting closes.

/// Mutable state for a single scan session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanState {
    /// Characters consumed since the last completed or discarded candidate
    buffer: String,
    /// Unmatched `{` minus `}` seen outside string literals
    brace_depth: i64,
    /// Whether the cursor is inside a quoted string literal
    in_string: bool,
    /// Whether the previous character was an unescaped backslash
    pending_escape: bool,
}

impl ScanState {
    /// Creates a scan state in its initial position: empty buffer, depth 0,
    /// outside any string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one character into the state machine.
    ///
    /// Returns the candidate object text when this character is a closing
    /// brace that brings the depth back to exactly zero and the buffer holds
    /// more than whitespace. The state is reset before returning, so the next
    /// character starts a fresh candidate.
    pub fn push(&mut self, c: char) -> Option<String> {
        self.buffer.push(c);

        if c == '"' && !self.pending_escape {
            self.in_string = !self.in_string;
        }

        // Applies to every character, in or out of a string literal.
        self.pending_escape = c == '\\' && !self.pending_escape;

        if self.in_string {
            return None;
        }

        match c {
            '{' => {
                self.brace_depth += 1;
                None
            }
            '}' => {
                self.brace_depth -= 1;
                if self.brace_depth == 0 && !self.buffer.trim().is_empty() {
                    Some(self.take())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Feeds every character of `fragment`, collecting the candidates that
    /// complete along the way.
    pub fn push_str(&mut self, fragment: &str) -> Vec<String> {
        fragment.chars().filter_map(|c| self.push(c)).collect()
    }

    /// Takes the buffered text and resets the state to its initial values.
    fn take(&mut self) -> String {
        let text = std::mem::take(&mut self.buffer);
        self.reset();
        text
    }

    /// Resets the state, discarding anything buffered.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.brace_depth = 0;
        self.in_string = false;
        self.pending_escape = false;
    }

    /// Text consumed since the last completed candidate.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current brace depth. Negative after stray closing braces.
    #[must_use]
    pub const fn depth(&self) -> i64 {
        self.brace_depth
    }

    #[must_use]
    pub const fn in_string(&self) -> bool {
        self.in_string
    }

    /// Whether a partially assembled object is held: an open brace, or
    /// anything other than whitespace in the buffer.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.brace_depth != 0 || !self.buffer.trim().is_empty()
    }
}
