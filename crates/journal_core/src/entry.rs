//! Journal entry shapes.
//!
//! Entries are flat JSON objects. Every entry carries `_type`, `_timestamp`
//! and `_thread`; the remaining keys depend on the entry kind.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Ordered map of field name to JSON value.
pub type Fields = Map<String, Value>;

/// Entry discriminator key.
pub const TYPE_KEY: &str = "_type";
/// Clock value assigned at append time.
pub const TIMESTAMP_KEY: &str = "_timestamp";
/// Identifier of the appending thread.
pub const THREAD_KEY: &str = "_thread";
/// Message text of a `JournalMessage`.
pub const VALUE_KEY: &str = "_value";
/// Severity of a `JournalMessage`.
pub const LEVEL_KEY: &str = "_level";
/// Title of a context BEGIN entry.
pub const TITLE_KEY: &str = "_title";
/// BEGIN/END marker of a `JournalContextControl`.
pub const CONTROL_KEY: &str = "control";

/// Keys the journal assigns itself; callers can never set them.
pub const RESERVED_KEYS: [&str; 3] = [TYPE_KEY, TIMESTAMP_KEY, THREAD_KEY];

/// Returns true if `key` is assigned by the journal rather than the caller.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// The `_type` of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// A log statement.
    #[serde(rename = "JournalMessage")]
    Message,
    /// A context BEGIN or END marker.
    #[serde(rename = "JournalContextControl")]
    ContextControl,
}

impl EntryKind {
    /// The wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "JournalMessage",
            Self::ContextControl => "JournalContextControl",
        }
    }

    /// Parses a wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "JournalMessage" => Some(Self::Message),
            "JournalContextControl" => Some(Self::ContextControl),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `control` value of a `JournalContextControl` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContextControl {
    /// Opens a context.
    Begin,
    /// Closes the innermost open context of the thread.
    End,
}

impl ContextControl {
    /// The wire name of this marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Begin => "BEGIN",
            Self::End => "END",
        }
    }

    /// Parses a wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BEGIN" => Some(Self::Begin),
            "END" => Some(Self::End),
            _ => None,
        }
    }
}

/// Identifier of the calling thread, as written into `_thread`.
pub fn current_thread_id() -> String {
    format!("{:?}", std::thread::current().id())
}

/// Merges caller fields into an entry whose reserved keys are already set.
///
/// Caller values for reserved keys are dropped.
pub(crate) fn merge_caller_fields(entry: &mut Fields, fields: Fields) {
    for (key, value) in fields {
        if !is_reserved_key(&key) {
            entry.insert(key, value);
        }
    }
}
