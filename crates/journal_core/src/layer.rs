//! `tracing` integration.
//!
//! [`JournalLayer`] lets ordinary `tracing` call sites feed a journal. An
//! event is journal-worthy when it has a `journal` field holding a payload
//! object:
//!
//! ```
//! use journal_core::{Journal, JournalLayer, JournalLogHandler, MemorySink, Payload};
//! use std::sync::Arc;
//! use tracing_subscriber::prelude::*;
//!
//! let sink = MemorySink::new();
//! let journal = Arc::new(Journal::new());
//! journal.open_with_file(sink.clone()).unwrap();
//!
//! let subscriber = tracing_subscriber::registry()
//!     .with(JournalLayer::new(JournalLogHandler::with_journal(journal)));
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(journal = %Payload::new().with("foo", "bar"), "Hello, World!");
//!     tracing::info!("not journaled");
//! });
//! assert!(!sink.is_empty());
//! ```

use crate::handler::JournalLogHandler;
use crate::logger::LogRecord;
use crate::payload::{Payload, JOURNAL_FIELD};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// A `tracing_subscriber` layer that journals events carrying a payload.
///
/// A layer can't return errors to the code that emitted the event, and
/// journal failures must not go unnoticed, so a failed append (or a
/// `journal` field that isn't a JSON object) panics on the emitting thread.
/// With no target journal the event is dropped before its field is parsed.
pub struct JournalLayer {
    handler: JournalLogHandler,
}

impl JournalLayer {
    /// Journals through `handler`.
    pub fn new(handler: JournalLogHandler) -> Self {
        Self { handler }
    }

    /// Journals into whatever the global journal is at event time.
    pub fn global() -> Self {
        Self::new(JournalLogHandler::global())
    }
}

impl<S: Subscriber> Layer<S> for JournalLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = JournalVisitor::default();
        event.record(&mut visitor);

        let Some(raw) = visitor.payload else {
            return;
        };
        // No journal configured: the event is dropped, however its field looks
        if self.handler.journal().is_none() {
            return;
        }
        let payload: Payload = match raw.parse() {
            Ok(payload) => payload,
            Err(e) => panic!("invalid `{}` field on log event: {}", JOURNAL_FIELD, e),
        };

        let metadata = event.metadata();
        let record = LogRecord {
            logger: metadata.target(),
            level: *metadata.level(),
            message: &visitor.message,
            payload: Some(&payload),
        };
        if let Err(e) = self.handler.emit(&record) {
            panic!("journal append failed: {}", e);
        }
    }
}

#[derive(Default)]
struct JournalVisitor {
    message: String,
    payload: Option<String>,
}

impl Visit for JournalVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            JOURNAL_FIELD => self.payload = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            JOURNAL_FIELD => self.payload = Some(format!("{:?}", value)),
            _ => {}
        }
    }
}
