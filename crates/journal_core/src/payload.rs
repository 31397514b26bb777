//! Caller-supplied journal payloads.
//!
//! A payload is the open map attached to a log call that marks it as
//! journal-worthy. A few keys are consumed by the handler; everything else is
//! copied into the journal entry unchanged.

use crate::entry::Fields;
use crate::error::{JournalError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Name of the log field carrying the payload.
pub const JOURNAL_FIELD: &str = "journal";
/// When truthy, the statement is never journaled.
pub const NO_JOURNAL_KEY: &str = "nojournal";
/// Replaces the rendered log text as the entry's `_value`.
pub const OVERRIDE_MESSAGE_KEY: &str = "_journal_message";
/// Rendering hint for report tools.
pub const FORMAT_KEY: &str = "format";
/// `format` used when the payload doesn't name one.
pub const DEFAULT_FORMAT: &str = "pre";

/// Dynamically keyed payload of a journal-worthy log statement.
///
/// ```
/// use journal_core::Payload;
///
/// let payload = Payload::new().with("foo", "bar").format("FMT");
/// assert_eq!(payload.to_string(), r#"{"foo":"bar","format":"FMT"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Fields);

impl Payload {
    /// Creates an empty payload. An empty payload still marks the statement
    /// as journal-worthy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing field map.
    pub fn from_fields(fields: Fields) -> Self {
        Self(fields)
    }

    /// Adds a field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Adds a field from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if `value` can't be represented as JSON.
    pub fn try_with<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.0.insert(key.into(), value);
        Ok(self)
    }

    /// Marks the statement as not journal-worthy.
    pub fn no_journal(self) -> Self {
        self.with(NO_JOURNAL_KEY, true)
    }

    /// Journals `message` instead of the rendered log text.
    pub fn override_message(self, message: impl Into<String>) -> Self {
        self.with(OVERRIDE_MESSAGE_KEY, message.into())
    }

    /// Sets the rendering hint.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.with(FORMAT_KEY, format.into())
    }

    /// Inserts a field in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if the payload has `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns true if the payload carries a truthy suppression flag.
    pub fn is_suppressed(&self) -> bool {
        self.0.get(NO_JOURNAL_KEY).is_some_and(is_truthy)
    }

    /// Returns true if the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the fields.
    pub fn as_fields(&self) -> &Fields {
        &self.0
    }

    /// Consumes the payload, returning its fields.
    pub fn into_fields(self) -> Fields {
        self.0
    }
}

impl From<Fields> for Payload {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

/// Compact JSON, so a payload can be attached to a `tracing` event as
/// `journal = %payload`.
impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Payload {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(other) => Err(JournalError::MalformedPayload(format!(
                "expected a JSON object, got {}",
                other
            ))),
            Err(e) => Err(JournalError::MalformedPayload(e.to_string())),
        }
    }
}

/// Truthiness of a suppression flag: `false`, `null`, zero and empty values
/// don't suppress.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
