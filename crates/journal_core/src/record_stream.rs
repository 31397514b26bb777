//! Framing of JSON documents over a byte stream.
//!
//! Each frame is one compact JSON document followed by `\n`. Compact JSON
//! never contains a raw newline (control characters inside strings are
//! escaped), so document content cannot collide with the delimiter. A frame
//! only becomes visible to a reader once its terminating newline has been
//! written; an unterminated tail is treated as end of stream.

use crate::error::{JournalError, Result};
use serde_json::Value;
use std::io::{BufRead, Write};

const DELIMITER: u8 = b'\n';

/// Writes one JSON document per frame.
pub struct RecordOutputStream<W: Write> {
    inner: W,
}

impl<W: Write> RecordOutputStream<W> {
    /// Wraps a byte sink.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Appends one document.
    ///
    /// The text is re-encoded compactly, so pretty-printed input is accepted.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if `document` is not valid JSON, or `Io` if
    /// the sink rejects the write.
    pub fn write(&mut self, document: &str) -> Result<()> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| JournalError::Serialization(e.to_string()))?;
        self.write_value(&value)
    }

    /// Appends one already-decoded document.
    ///
    /// The whole frame is encoded before anything reaches the sink, so a
    /// value that fails to encode leaves the stream untouched.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        let mut frame = serde_json::to_vec(value)?;
        frame.push(DELIMITER);
        self.inner.write_all(&frame)?;
        Ok(())
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwraps the stream, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Yields the documents of a record stream in write order.
///
/// Iteration is lazy. To read again from the start, wrap a fresh reader
/// over the same source.
pub struct RecordInputStream<R: BufRead> {
    inner: R,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> RecordInputStream<R> {
    /// Wraps a byte source positioned at the start of a frame.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for RecordInputStream<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            let read = match self.inner.read_until(DELIMITER, &mut self.buf) {
                Ok(n) => n,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };

            // EOF, or a partially written trailing frame
            if read == 0 || self.buf.last() != Some(&DELIMITER) {
                self.done = true;
                return None;
            }

            self.buf.pop();
            if self.buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            return Some(
                String::from_utf8(std::mem::take(&mut self.buf))
                    .map_err(|e| JournalError::Serialization(e.to_string())),
            );
        }
        None
    }
}
