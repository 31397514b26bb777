//! Journal Core Library
//!
//! A structured event journal that runs alongside ordinary logging:
//! - An append-only stream of timestamped JSON entries
//! - Context BEGIN/END markers bracketing units of work
//! - A log handler that mirrors journal-worthy statements into the journal
//! - A process-wide journal that any component can write to
//!
//! # Quick Start
//!
//! ```
//! use journal_core::{Journal, JournalLogHandler, JournalLogger, Log, MemorySink, Payload};
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let journal = Arc::new(Journal::new());
//! journal.open_with_file(sink.clone()).unwrap();
//!
//! let logger = JournalLogger::new("quickstart").with_journal(journal.clone());
//! logger.add_handler(Arc::new(JournalLogHandler::with_journal(journal.clone())));
//!
//! logger
//!     .info("Hello, World!", Some(&Payload::new().with("foo", "bar")))
//!     .unwrap();
//! journal.close().unwrap();
//!
//! let text = String::from_utf8(sink.contents()).unwrap();
//! assert!(text.contains(r#""_value":"Hello, World!""#));
//! ```
//!
//! # Features
//!
//! ## Injectable Time
//!
//! Every entry is stamped in microseconds by a [`Clock`]. Tests swap in a
//! deterministic one:
//!
//! ```
//! use journal_core::{Clock, SteppingClock};
//!
//! let clock = SteppingClock::starting_at(1000);
//! assert_eq!(clock.now(), 1001);
//! assert_eq!(clock.now(), 1002);
//! assert_eq!(clock.last_time(), 1002);
//! ```
//!
//! ## Replay
//!
//! Journals are newline-delimited JSON and can be read back in order:
//!
//! ```
//! use journal_core::{read_entries, verify_entries, Journal, JournalLogger, MemorySink, Payload};
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let journal = Arc::new(Journal::new());
//! journal.open_with_file(sink.clone()).unwrap();
//!
//! let logger = JournalLogger::new("replay").with_journal(journal);
//! logger.execute_in_context("step", Payload::new(), || ()).unwrap();
//!
//! let entries = read_entries(sink.reader()).unwrap();
//! assert_eq!(entries.len(), 2);
//! assert!(!verify_entries(&entries).has_issues());
//! ```

mod clock;
mod config;
mod context;
mod entry;
mod error;
mod global;
mod handler;
mod journal;
mod journal_logger;
mod layer;
mod logger;
mod payload;
mod record_stream;
mod replay;
mod sink;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::{Config, JournalSettings, LoggingConfig, CONFIG_FILE_NAME};
pub use context::{context_depth, current_context, ContextGuard};
pub use entry::{
    current_thread_id, is_reserved_key, ContextControl, EntryKind, Fields, CONTROL_KEY,
    LEVEL_KEY, RESERVED_KEYS, THREAD_KEY, TIMESTAMP_KEY, TITLE_KEY, TYPE_KEY, VALUE_KEY,
};
pub use error::{JournalError, Result};
pub use global::{
    get_global_journal, new_global_journal_with_path, set_global_journal, GlobalJournalGuard,
};
pub use handler::{JournalLogHandler, JournalTarget, MessageDraft};
pub use journal::Journal;
pub use journal_logger::JournalLogger;
pub use layer::JournalLayer;
pub use logger::{Handler, Log, LogRecord, Logger};
pub use payload::{
    Payload, DEFAULT_FORMAT, FORMAT_KEY, JOURNAL_FIELD, NO_JOURNAL_KEY, OVERRIDE_MESSAGE_KEY,
};
pub use record_stream::{RecordInputStream, RecordOutputStream};
pub use replay::{
    journal_stats, read_entries, verify_entries, JournalReader, JournalStats, UnclosedContext,
    UnmatchedEnd, VerifyReport,
};
pub use sink::MemorySink;
