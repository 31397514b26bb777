//! Scoped journal contexts.

use crate::entry::Fields;
use crate::error::Result;
use crate::journal::Journal;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error};

thread_local! {
    /// Titles of the contexts open on this thread, innermost last.
    static CONTEXT_STACK: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Number of contexts currently open on the calling thread.
pub fn context_depth() -> usize {
    CONTEXT_STACK.with(|stack| stack.borrow().len())
}

/// Title of the innermost context open on the calling thread.
pub fn current_context() -> Option<String> {
    CONTEXT_STACK.with(|stack| stack.borrow().last().cloned())
}

/// An open context. Writes the END entry when ended or dropped.
///
/// END goes to the journal that received BEGIN, even if the global journal
/// changes in between. Dropping the guard while a panic unwinds still writes
/// END, so readers always see balanced pairs.
///
/// The guard must end on the thread that began it.
#[must_use = "the context ends as soon as the guard is dropped"]
pub struct ContextGuard {
    journal: Option<Arc<Journal>>,
    title: String,
    ended: bool,
    _not_send: PhantomData<*const ()>,
}

impl ContextGuard {
    /// Writes BEGIN to `journal` (when there is one) and opens the context.
    pub(crate) fn begin(journal: Option<Arc<Journal>>, title: &str, extra: Fields) -> Result<Self> {
        if let Some(journal) = &journal {
            journal.begin_context(title, extra)?;
        }

        let depth = CONTEXT_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(title.to_string());
            stack.len() - 1
        });
        debug!("+context[{}]: {}", depth, title);

        Ok(Self {
            journal,
            title: title.to_string(),
            ended: false,
            _not_send: PhantomData,
        })
    }

    /// Title given at BEGIN.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Ends the context, reporting a failure to write END.
    pub fn end(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        self.ended = true;
        let depth = CONTEXT_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.pop();
            stack.len()
        });
        debug!("-context[{}]", depth);

        match &self.journal {
            Some(journal) => journal.end_context(),
            None => Ok(()),
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        if self.ended {
            return;
        }
        if std::thread::panicking() {
            error!(context = %self.title, "Panic unwinding out of context");
        }
        if let Err(e) = self.finish() {
            error!(context = %self.title, "Failed to write context END: {}", e);
        }
    }
}
