//! Line-at-a-time reading of fixed-width sources.
//!
//! Lines are split on `\n`; a `\r` directly before it is dropped too. A final
//! line without a terminator is still returned. Input that is not valid UTF-8
//! is decoded one byte per character (Latin-1), so character offsets keep
//! matching byte positions in single-byte extracts.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{IngestError, Result};

/// Reads one line at a time, reusing the same buffers for every line.
pub struct LineReader<R> {
    inner: R,
    bytes: Vec<u8>,
    line: String,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes: Vec::new(),
            line: String::new(),
        }
    }

    /// Read the next line without its terminator, or `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<&str>> {
        self.bytes.clear();
        if self.inner.read_until(b'\n', &mut self.bytes)? == 0 {
            return Ok(None);
        }
        if self.bytes.last() == Some(&b'\n') {
            self.bytes.pop();
            if self.bytes.last() == Some(&b'\r') {
                self.bytes.pop();
            }
        }
        self.line.clear();
        match std::str::from_utf8(&self.bytes) {
            Ok(text) => self.line.push_str(text),
            Err(_) => self.line.extend(self.bytes.iter().map(|&b| char::from(b))),
        }
        Ok(Some(&self.line))
    }
}

/// Open a source file for sequential line reading.
pub fn open_source(path: &Path) -> Result<LineReader<BufReader<File>>> {
    let file = File::open(path).map_err(|source| IngestError::source_unavailable(path, source))?;
    Ok(LineReader::new(BufReader::new(file)))
}
