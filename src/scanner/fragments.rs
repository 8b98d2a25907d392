//! Line-oriented text fragments from any buffered reader.
use std::io::{self, BufRead, ErrorKind};

/// Iterator over the lines of a reader, line terminators included.
///
/// Bytes are decoded lossily, so invalid UTF-8 becomes `U+FFFD` rather than
/// an error. Only genuine read failures are yielded as `Err`.
#[derive(Debug)]
pub struct Fragments<R> {
    reader: R,
    line: Vec<u8>,
}

impl<R: BufRead> Fragments<R> {
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
        }
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for Fragments<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    return Some(Ok(
                        String::from_utf8_lossy(&self.line).into_owned()
                    ));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
