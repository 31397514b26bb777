//! Error types for journal operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// The journal already has a sink bound.
    #[error("journal is already open")]
    AlreadyOpen,

    /// The journal was closed; it must be reopened before appending.
    #[error("journal is closed")]
    Closed,

    /// A sink error stopped the journal; it must be reopened before appending.
    #[error("journal stopped after a sink failure")]
    Failed,

    /// The journal was never opened.
    #[error("journal is not open")]
    NotOpen,

    /// I/O error while writing to or reading from the sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A payload value could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A frame read back from a record stream is not a JSON object.
    #[error("malformed record #{index}: {reason}")]
    MalformedRecord {
        /// Zero-based position of the frame in the stream
        index: usize,
        /// Description of what's wrong
        reason: String,
    },

    /// A journal payload attached to a log event is not a JSON object.
    #[error("malformed journal payload: {0}")]
    MalformedPayload(String),

    /// Another process holds the lock on the journal file.
    #[error("journal file locked by another process: {}", .0.display())]
    JournalLocked(PathBuf),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl JournalError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyOpen => Some("Close the journal before opening it on another sink."),
            Self::Closed => Some("Reopen the journal with open_with_file before appending."),
            Self::Failed => {
                Some("Check the disk or sink that failed, then reopen the journal on a fresh sink.")
            }
            Self::JournalLocked(_) => {
                Some("Another run is writing this journal. Pick a different path or wait for it to finish.")
            }
            Self::MalformedRecord { .. } => {
                Some("The file may not be a journal, or was written by a crashed process. Run 'journal verify' to inspect it.")
            }
            Self::MalformedPayload(_) => {
                Some("Pass the payload as a JSON object, e.g. journal = %Payload::new().with(\"key\", \"value\").")
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            JournalError::Io(err.into())
        } else {
            JournalError::Serialization(err.to_string())
        }
    }
}

/// Convenience Result type for journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;
