//! Bridge from log statements to journal entries.

use crate::config::JournalSettings;
use crate::entry::Fields;
use crate::error::Result;
use crate::global::get_global_journal;
use crate::journal::Journal;
use crate::logger::{Handler, LogRecord};
use crate::payload::{Payload, DEFAULT_FORMAT, FORMAT_KEY, NO_JOURNAL_KEY, OVERRIDE_MESSAGE_KEY};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Where journal entries go.
#[derive(Debug, Clone)]
pub enum JournalTarget {
    /// A journal held by this handler or logger.
    Owned(Arc<Journal>),
    /// Whatever the global registry holds at call time.
    Global,
}

impl JournalTarget {
    /// The journal to write to right now, if any.
    pub fn resolve(&self) -> Option<Arc<Journal>> {
        match self {
            Self::Owned(journal) => Some(journal.clone()),
            Self::Global => get_global_journal(),
        }
    }
}

/// A journal entry built from a log statement, before timestamping.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    /// `_value`: the override message or the rendered text.
    pub value: String,
    /// `_level`.
    pub level: String,
    /// Pass-through payload fields plus `format`.
    pub fields: Fields,
}

/// Log handler that mirrors journal-worthy statements into a journal.
///
/// A statement is journal-worthy when it carries a payload that isn't
/// suppressed with `nojournal`. Everything else is ignored here and left to
/// the rest of the logging pipeline.
///
/// Built with [`global`](Self::global), the handler looks up the global
/// journal on every statement and does nothing while none is installed.
pub struct JournalLogHandler {
    target: JournalTarget,
    default_format: String,
}

impl JournalLogHandler {
    /// Handler writing to the global journal.
    pub fn global() -> Self {
        Self::with_target(JournalTarget::Global)
    }

    /// Handler writing to `journal`.
    pub fn with_journal(journal: Arc<Journal>) -> Self {
        Self::with_target(JournalTarget::Owned(journal))
    }

    /// Handler owning a new journal bound to `sink`.
    pub fn with_sink<W: Write + Send + 'static>(sink: W) -> Result<Self> {
        let journal = Journal::new();
        journal.open_with_file(sink)?;
        Ok(Self::with_journal(Arc::new(journal)))
    }

    /// Handler owning a new journal on the file at `path`.
    pub fn with_path(path: impl AsRef<Path>, settings: &JournalSettings) -> Result<Self> {
        let journal = Journal::from_settings(settings);
        journal.open_with_path(path)?;
        Ok(Self::with_journal(Arc::new(journal))
            .with_default_format(settings.default_format.clone()))
    }

    /// Handler for an explicit target.
    pub fn with_target(target: JournalTarget) -> Self {
        Self {
            target,
            default_format: DEFAULT_FORMAT.to_string(),
        }
    }

    /// `format` to write when the payload doesn't carry one.
    pub fn with_default_format(mut self, format: impl Into<String>) -> Self {
        self.default_format = format.into();
        self
    }

    /// The journal this handler would write to right now.
    pub fn journal(&self) -> Option<Arc<Journal>> {
        self.target.resolve()
    }

    /// Builds the entry for `record`, or `None` if it isn't journal-worthy.
    pub fn draft(&self, record: &LogRecord<'_>) -> Option<MessageDraft> {
        let payload = record.payload?;
        if payload.is_suppressed() {
            return None;
        }
        Some(draft_message(record, payload, &self.default_format))
    }

    /// Journals `record` if it is journal-worthy.
    ///
    /// # Errors
    ///
    /// Propagates journal failures (closed journal, sink I/O).
    pub fn emit(&self, record: &LogRecord<'_>) -> Result<()> {
        let Some(draft) = self.draft(record) else {
            return Ok(());
        };
        let Some(journal) = self.target.resolve() else {
            return Ok(());
        };
        journal.write_message(&draft.value, &draft.level, draft.fields)
    }

    /// Closes a journal this handler owns. A global-target handler leaves
    /// the global journal alone.
    pub fn close(&self) -> Result<()> {
        match &self.target {
            JournalTarget::Owned(journal) => journal.close(),
            JournalTarget::Global => Ok(()),
        }
    }
}

impl Handler for JournalLogHandler {
    fn handle(&self, record: &LogRecord<'_>) -> Result<()> {
        self.emit(record)
    }

    fn flush(&self) -> Result<()> {
        match self.target.resolve() {
            Some(journal) => journal.flush(),
            None => Ok(()),
        }
    }
}

fn draft_message(record: &LogRecord<'_>, payload: &Payload, default_format: &str) -> MessageDraft {
    let value = match payload.get(OVERRIDE_MESSAGE_KEY) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => record.message.to_string(),
    };

    let mut fields = Fields::new();
    for (key, value) in payload.as_fields() {
        if key != OVERRIDE_MESSAGE_KEY && key != NO_JOURNAL_KEY && key != FORMAT_KEY {
            fields.insert(key.clone(), value.clone());
        }
    }
    let format = payload
        .get(FORMAT_KEY)
        .cloned()
        .unwrap_or_else(|| Value::from(default_format));
    fields.insert(FORMAT_KEY.to_string(), format);

    MessageDraft {
        value,
        level: record.level.to_string(),
        fields,
    }
}
