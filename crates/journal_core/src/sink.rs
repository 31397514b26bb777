//! In-memory journal sink.

use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A cloneable in-memory byte sink.
///
/// The journal takes ownership of one clone while the caller keeps another
/// to read back what was written.
///
/// ```
/// use journal_core::{Journal, MemorySink};
///
/// let sink = MemorySink::new();
/// let journal = Journal::new();
/// journal.open_with_file(sink.clone()).unwrap();
/// assert!(sink.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Copies out everything written from byte `offset` onward.
    pub fn contents_from(&self, offset: usize) -> Vec<u8> {
        let bytes = self.lock();
        bytes.get(offset..).map(<[u8]>::to_vec).unwrap_or_default()
    }

    /// A reader positioned at the start of the written bytes.
    pub fn reader(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.contents())
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
