//! The journal: an append-only stream of structured entries.

use crate::clock::{Clock, SystemClock};
use crate::config::JournalSettings;
use crate::entry::{
    current_thread_id, merge_caller_fields, ContextControl, EntryKind, Fields, CONTROL_KEY,
    LEVEL_KEY, THREAD_KEY, TIMESTAMP_KEY, TITLE_KEY, TYPE_KEY, VALUE_KEY,
};
use crate::error::{JournalError, Result};
use crate::record_stream::RecordOutputStream;
use fs2::FileExt;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

type Sink = Box<dyn Write + Send>;

enum SinkState {
    /// Never opened. Appends are no-ops.
    Unopened,
    Open {
        stream: RecordOutputStream<Sink>,
        /// Holds the advisory lock on a journal file for as long as it's open.
        _lock: Option<File>,
    },
    /// Closed explicitly. Appends fail until the journal is reopened.
    Closed,
    /// The sink failed mid-write and was dropped. Appends fail until the
    /// journal is reopened.
    Failed,
}

/// Owner of one append-only stream of journal entries.
///
/// Lifecycle: a new journal is unopened and silently drops appends.
/// [`open_with_file`](Self::open_with_file) binds a sink; opening a journal
/// that is already open fails with `AlreadyOpen` (close it first).
/// [`close`](Self::close) flushes and releases the sink; appending to a
/// closed journal fails with `Closed` until it is opened again.
/// A sink write or flush error is fatal: the sink is dropped and every later
/// append fails with `Failed`, so nothing is written after a partial frame.
///
/// All methods take `&self`. One lock guards the timestamp, encode and
/// write of every entry, so the order of entries in the stream matches the
/// order of their timestamps.
///
/// # Examples
///
/// ```
/// use journal_core::{Journal, MemorySink, RecordInputStream, SteppingClock};
/// use std::sync::Arc;
///
/// let sink = MemorySink::new();
/// let journal = Journal::with_clock(Arc::new(SteppingClock::starting_at(0)));
/// journal.open_with_file(sink.clone()).unwrap();
/// journal.begin_context("setup", Default::default()).unwrap();
/// journal.end_context().unwrap();
/// journal.close().unwrap();
///
/// let frames: Vec<String> = RecordInputStream::new(sink.reader())
///     .map(|f| f.unwrap())
///     .collect();
/// assert_eq!(frames.len(), 2);
/// ```
pub struct Journal {
    clock: Arc<dyn Clock>,
    flush_each_entry: bool,
    lock_file: bool,
    state: Mutex<SinkState>,
}

impl Journal {
    /// Creates an unopened journal using wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Creates an unopened journal with an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            flush_each_entry: true,
            lock_file: true,
            state: Mutex::new(SinkState::Unopened),
        }
    }

    /// Creates an unopened journal configured from settings.
    pub fn from_settings(settings: &JournalSettings) -> Self {
        Self::new()
            .with_flush_each_entry(settings.flush_each_entry)
            .with_file_lock(settings.lock_file)
    }

    /// Whether to flush the sink after every entry.
    pub fn with_flush_each_entry(mut self, flush: bool) -> Self {
        self.flush_each_entry = flush;
        self
    }

    /// Whether [`open_with_path`](Self::open_with_path) locks the file.
    pub fn with_file_lock(mut self, lock: bool) -> Self {
        self.lock_file = lock;
        self
    }

    /// Binds the output sink.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen` if a sink is already bound.
    pub fn open_with_file<W: Write + Send + 'static>(&self, sink: W) -> Result<()> {
        let mut state = self.lock_state();
        Self::bind(&mut state, Box::new(sink), None)
    }

    /// Creates (or truncates) the file at `path` and binds it as the sink.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen` if a sink is already bound, `JournalLocked` if
    /// another process holds the file, or `Io` if it can't be created.
    pub fn open_with_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        // Held through the bind so a concurrent open can't truncate our file
        let mut state = self.lock_state();
        if matches!(*state, SinkState::Open { .. }) {
            return Err(JournalError::AlreadyOpen);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Lock before truncating so a running writer's file is left intact
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        let lock = if self.lock_file {
            if file.try_lock_exclusive().is_err() {
                return Err(JournalError::JournalLocked(path.to_path_buf()));
            }
            Some(file.try_clone()?)
        } else {
            None
        };
        file.set_len(0)?;

        debug!(path = %path.display(), "opening journal file");
        Self::bind(&mut state, Box::new(BufWriter::new(file)), lock)
    }

    fn bind(state: &mut SinkState, sink: Sink, lock: Option<File>) -> Result<()> {
        if matches!(*state, SinkState::Open { .. }) {
            return Err(JournalError::AlreadyOpen);
        }
        *state = SinkState::Open {
            stream: RecordOutputStream::new(sink),
            _lock: lock,
        };
        Ok(())
    }

    /// Returns true while a sink is bound.
    pub fn is_open(&self) -> bool {
        matches!(*self.lock_state(), SinkState::Open { .. })
    }

    /// Returns true after [`close`](Self::close) until the next open.
    pub fn is_closed(&self) -> bool {
        matches!(*self.lock_state(), SinkState::Closed)
    }

    /// Returns true once a sink error has stopped the journal, until the
    /// next open.
    pub fn is_failed(&self) -> bool {
        matches!(*self.lock_state(), SinkState::Failed)
    }

    /// Appends one entry.
    ///
    /// `_type`, `_timestamp` and `_thread` are assigned here; caller values
    /// for those keys are dropped. The clock is read, the entry encoded and
    /// the frame written while holding the journal lock.
    ///
    /// On a never-opened journal this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Closed` after [`close`](Self::close), `Failed` after an
    /// earlier sink error, or `Io` if this write fails. An `Io` error stops
    /// the journal.
    pub fn append(&self, kind: EntryKind, fields: Fields) -> Result<()> {
        let mut state = self.lock_state();
        let stream = match &mut *state {
            SinkState::Unopened => return Ok(()),
            SinkState::Closed => return Err(JournalError::Closed),
            SinkState::Failed => return Err(JournalError::Failed),
            SinkState::Open { stream, .. } => stream,
        };

        let mut entry = Fields::new();
        entry.insert(TYPE_KEY.to_string(), Value::from(kind.as_str()));
        entry.insert(TIMESTAMP_KEY.to_string(), Value::from(self.clock.now()));
        entry.insert(THREAD_KEY.to_string(), Value::from(current_thread_id()));
        merge_caller_fields(&mut entry, fields);

        let written = stream.write_value(&Value::Object(entry)).and_then(|()| {
            if self.flush_each_entry {
                stream.flush()
            } else {
                Ok(())
            }
        });
        Self::check_sink(&mut state, written)
    }

    /// Drops the sink after an I/O error so no frame follows a partial one.
    fn check_sink(state: &mut SinkState, result: Result<()>) -> Result<()> {
        if let Err(JournalError::Io(e)) = &result {
            warn!("Journal sink failed, dropping it: {}", e);
            *state = SinkState::Failed;
        }
        result
    }

    /// Appends a `JournalMessage` entry.
    ///
    /// `level` is written verbatim as `_level`; `extra` fields are copied
    /// as top-level keys after `_value` and `_level`.
    pub fn write_message(&self, message: &str, level: &str, extra: Fields) -> Result<()> {
        let mut fields = Fields::new();
        fields.insert(VALUE_KEY.to_string(), Value::from(message));
        fields.insert(LEVEL_KEY.to_string(), Value::from(level));
        for (key, value) in extra {
            if key != VALUE_KEY && key != LEVEL_KEY {
                fields.insert(key, value);
            }
        }
        self.append(EntryKind::Message, fields)
    }

    /// Appends a context BEGIN entry carrying `title` and `extra`.
    pub fn begin_context(&self, title: &str, extra: Fields) -> Result<()> {
        let mut fields = Fields::new();
        fields.insert(CONTROL_KEY.to_string(), Value::from(ContextControl::Begin.as_str()));
        fields.insert(TITLE_KEY.to_string(), Value::from(title));
        for (key, value) in extra {
            if key != CONTROL_KEY && key != TITLE_KEY {
                fields.insert(key, value);
            }
        }
        self.append(EntryKind::ContextControl, fields)
    }

    /// Appends a context END entry.
    pub fn end_context(&self) -> Result<()> {
        let mut fields = Fields::new();
        fields.insert(CONTROL_KEY.to_string(), Value::from(ContextControl::End.as_str()));
        self.append(EntryKind::ContextControl, fields)
    }

    /// Flushes the sink, if one is bound. A failed flush stops the journal.
    pub fn flush(&self) -> Result<()> {
        let mut state = self.lock_state();
        let flushed = match &mut *state {
            SinkState::Open { stream, .. } => stream.flush(),
            _ => return Ok(()),
        };
        Self::check_sink(&mut state, flushed)
    }

    /// Flushes and releases the sink.
    ///
    /// # Errors
    ///
    /// Returns `NotOpen` on a never-opened journal, `Closed` if already
    /// closed, or `Io` if the final flush fails. The sink is released even
    /// when the flush fails. Closing a failed journal succeeds.
    pub fn close(&self) -> Result<()> {
        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, SinkState::Closed) {
            SinkState::Open { mut stream, .. } => {
                debug!("closing journal");
                stream.flush()
            }
            SinkState::Unopened => {
                *state = SinkState::Unopened;
                Err(JournalError::NotOpen)
            }
            SinkState::Failed => Ok(()),
            SinkState::Closed => Err(JournalError::Closed),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SinkState> {
        // A panic can't leave the stream half-written: frames are built before the write.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match *self.lock_state() {
            SinkState::Unopened => "unopened",
            SinkState::Open { .. } => "open",
            SinkState::Closed => "closed",
            SinkState::Failed => "failed",
        };
        f.debug_struct("Journal")
            .field("state", &state)
            .field("flush_each_entry", &self.flush_each_entry)
            .finish()
    }
}

impl Drop for Journal {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let SinkState::Open { stream, .. } = state {
            if let Err(e) = stream.flush() {
                warn!("Failed to flush journal on drop: {}", e);
            }
        }
    }
}
