//! Journal-aware logging façade.

use crate::context::{self, ContextGuard};
use crate::error::{JournalError, Result};
use crate::handler::JournalTarget;
use crate::journal::Journal;
use crate::logger::{Handler, Log, Logger};
use crate::payload::{Payload, DEFAULT_FORMAT, FORMAT_KEY};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, Level};

/// Wraps any [`Log`] implementation and adds journal contexts.
///
/// Every statement issued through a `JournalLogger` is journal-worthy: a
/// statement without a payload gets an empty one, so attached journal
/// handlers record it. Context markers go to the logger's own journal
/// target, which defaults to the global journal.
///
/// # Examples
///
/// ```
/// use journal_core::{
///     Journal, JournalLogHandler, JournalLogger, Log, MemorySink, Payload, SteppingClock,
/// };
/// use std::sync::Arc;
///
/// let sink = MemorySink::new();
/// let journal = Arc::new(Journal::with_clock(Arc::new(SteppingClock::starting_at(0))));
/// journal.open_with_file(sink.clone()).unwrap();
///
/// let logger = JournalLogger::new("example").with_journal(journal.clone());
/// logger.add_handler(Arc::new(JournalLogHandler::with_journal(journal)));
///
/// let answer = logger
///     .execute_in_context("compute", Payload::new(), || {
///         logger.debug("working", None)?;
///         Ok::<_, journal_core::JournalError>(42)
///     })
///     .unwrap()
///     .unwrap();
/// assert_eq!(answer, 42);
/// ```
pub struct JournalLogger<L: Log = Logger> {
    inner: L,
    target: JournalTarget,
}

impl JournalLogger<Logger> {
    /// Creates a journal logger over a plain [`Logger`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::wrap(Logger::new(name))
    }
}

impl<L: Log> JournalLogger<L> {
    /// Wraps an existing logger. Contexts go to the global journal.
    pub fn wrap(inner: L) -> Self {
        Self {
            inner,
            target: JournalTarget::Global,
        }
    }

    /// Sends context markers to `journal` instead of the global journal.
    pub fn with_journal(mut self, journal: Arc<Journal>) -> Self {
        self.target = JournalTarget::Owned(journal);
        self
    }

    /// The wrapped logger.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Logs `message` with a payload, defaulting `format` to `pre`.
    pub fn journal_or_log(&self, message: &str, level: Level, payload: Payload) -> Result<()> {
        let payload = if payload.contains_key(FORMAT_KEY) {
            payload
        } else {
            payload.format(DEFAULT_FORMAT)
        };
        self.inner.log(level, message, Some(&payload))
    }

    /// Logs `message` followed by `detail` rendered as indented JSON.
    ///
    /// A string detail holding JSON text is re-indented; any other string is
    /// appended as is.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if `detail` can't be represented as JSON.
    pub fn journal_or_log_detail<T: Serialize + ?Sized>(
        &self,
        message: &str,
        detail: &T,
        level: Level,
        payload: Payload,
    ) -> Result<()> {
        let rendered = render_detail(detail)?;
        self.journal_or_log(&format!("{}\n{}", message, rendered), level, payload)
    }

    /// Opens a context: writes BEGIN with `title` and the payload fields.
    ///
    /// The returned guard writes END when ended or dropped.
    pub fn begin_context(&self, title: &str, extra: Payload) -> Result<ContextGuard> {
        ContextGuard::begin(self.target.resolve(), title, extra.into_fields())
    }

    /// Runs `operation` between a BEGIN and an END entry.
    ///
    /// END is written on every exit path, including a panic unwinding out of
    /// `operation`; the panic then continues to the caller. The operation's
    /// return value is handed back after END has been written.
    ///
    /// # Errors
    ///
    /// Fails only if BEGIN or END can't be written. When END fails the
    /// operation has already run, but its return value is dropped and the
    /// END error is returned instead.
    pub fn execute_in_context<T>(
        &self,
        title: &str,
        extra: Payload,
        operation: impl FnOnce() -> T,
    ) -> Result<T> {
        let guard = self.begin_context(title, extra)?;
        let result = operation();
        guard.end()?;
        Ok(result)
    }

    /// Like [`execute_in_context`](Self::execute_in_context) for fallible
    /// operations: an `Err` is logged with the context title and returned
    /// after END has been written.
    ///
    /// A failure to write END takes precedence: it replaces the operation's
    /// result, `Ok` or `Err`. The operation's own error has been logged by
    /// then.
    pub fn try_in_context<T, E>(
        &self,
        title: &str,
        extra: Payload,
        operation: impl FnOnce() -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<JournalError> + Display,
    {
        let guard = self.begin_context(title, extra)?;
        let result = operation();
        if let Err(e) = &result {
            error!(context = %title, "Returning error out of context: {}", e);
        }
        guard.end()?;
        result
    }

    /// Number of contexts open on the calling thread.
    pub fn context_depth() -> usize {
        context::context_depth()
    }

    /// Title of the innermost context open on the calling thread.
    pub fn current_context() -> Option<String> {
        context::current_context()
    }
}

impl<L: Log> Log for JournalLogger<L> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.inner.add_handler(handler);
    }

    fn log(&self, level: Level, message: &str, payload: Option<&Payload>) -> Result<()> {
        match payload {
            Some(payload) => self.inner.log(level, message, Some(payload)),
            None => self.inner.log(level, message, Some(&Payload::new())),
        }
    }
}

fn render_detail<T: Serialize + ?Sized>(detail: &T) -> Result<String> {
    let value = serde_json::to_value(detail)?;
    let value = match value {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(text),
        },
        other => other,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}
