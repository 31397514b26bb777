//! Generic logging capability set.
//!
//! [`Log`] is what any logger must offer for a journal handler to plug into
//! it: one method per severity, a payload per call, and handler attachment.
//! [`Logger`] is the plain implementation: it forwards every statement to
//! `tracing` and then to its handlers.

use crate::error::Result;
use crate::payload::Payload;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::Level;

/// One log statement as seen by handlers.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// Name of the logger that issued the statement.
    pub logger: &'a str,
    /// Severity.
    pub level: Level,
    /// Rendered message text.
    pub message: &'a str,
    /// Journal payload, if the caller supplied one.
    pub payload: Option<&'a Payload>,
}

/// Receives log statements from a logger.
pub trait Handler: Send + Sync {
    /// Handles one statement.
    fn handle(&self, record: &LogRecord<'_>) -> Result<()>;

    /// Flushes anything the handler buffers.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// The logging capability set.
pub trait Log: Send + Sync {
    /// Logger name.
    fn name(&self) -> &str;

    /// Attaches a handler; it sees every later statement.
    fn add_handler(&self, handler: Arc<dyn Handler>);

    /// Issues one statement.
    fn log(&self, level: Level, message: &str, payload: Option<&Payload>) -> Result<()>;

    /// Issues a TRACE statement.
    fn trace(&self, message: &str, payload: Option<&Payload>) -> Result<()> {
        self.log(Level::TRACE, message, payload)
    }

    /// Issues a DEBUG statement.
    fn debug(&self, message: &str, payload: Option<&Payload>) -> Result<()> {
        self.log(Level::DEBUG, message, payload)
    }

    /// Issues an INFO statement.
    fn info(&self, message: &str, payload: Option<&Payload>) -> Result<()> {
        self.log(Level::INFO, message, payload)
    }

    /// Issues a WARN statement.
    fn warn(&self, message: &str, payload: Option<&Payload>) -> Result<()> {
        self.log(Level::WARN, message, payload)
    }

    /// Issues an ERROR statement.
    fn error(&self, message: &str, payload: Option<&Payload>) -> Result<()> {
        self.log(Level::ERROR, message, payload)
    }
}

/// Plain named logger.
///
/// Statements go to `tracing` first (without the payload) and then to each
/// attached handler in attachment order.
pub struct Logger {
    name: String,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
}

impl Logger {
    /// Creates a logger with no handlers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Number of attached handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Flushes every attached handler.
    pub fn flush(&self) -> Result<()> {
        for handler in self.snapshot_handlers() {
            handler.flush()?;
        }
        Ok(())
    }

    fn snapshot_handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Log for Logger {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    fn log(&self, level: Level, message: &str, payload: Option<&Payload>) -> Result<()> {
        emit_tracing(&self.name, level, message);

        let record = LogRecord {
            logger: &self.name,
            level,
            message,
            payload,
        };

        // Every handler sees the record; the first failure is reported
        let mut first_error = None;
        for handler in self.snapshot_handlers() {
            if let Err(e) = handler.handle(&record) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn emit_tracing(logger: &str, level: Level, message: &str) {
    if level == Level::ERROR {
        tracing::error!(logger, "{}", message);
    } else if level == Level::WARN {
        tracing::warn!(logger, "{}", message);
    } else if level == Level::INFO {
        tracing::info!(logger, "{}", message);
    } else if level == Level::DEBUG {
        tracing::debug!(logger, "{}", message);
    } else {
        tracing::trace!(logger, "{}", message);
    }
}
