//! Process-wide "current journal".
//!
//! Nothing is installed implicitly. Handlers built without their own journal
//! read this slot on every call, so it may be set after they are created.

use crate::config::JournalSettings;
use crate::error::Result;
use crate::journal::Journal;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

static GLOBAL_JOURNAL: RwLock<Option<Arc<Journal>>> = RwLock::new(None);

/// Serializes [`GlobalJournalGuard`] holders.
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// Replaces the current global journal, returning the previous one.
pub fn set_global_journal(journal: Option<Arc<Journal>>) -> Option<Arc<Journal>> {
    let mut slot = GLOBAL_JOURNAL
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, journal)
}

/// Returns the current global journal, if one is installed.
pub fn get_global_journal() -> Option<Arc<Journal>> {
    GLOBAL_JOURNAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Opens a journal on `path` and installs it as the global journal.
///
/// Any previously installed journal is replaced but not closed.
pub fn new_global_journal_with_path(
    path: impl AsRef<Path>,
    settings: &JournalSettings,
) -> Result<Arc<Journal>> {
    let journal = Arc::new(Journal::from_settings(settings));
    journal.open_with_path(path)?;
    set_global_journal(Some(journal.clone()));
    Ok(journal)
}

/// Installs a global journal for a scope and restores the previous one on
/// drop.
///
/// Guards are exclusive: a second guard blocks until the first is dropped,
/// so tests that install throwaway journals don't observe each other's.
///
/// ```
/// use journal_core::{get_global_journal, GlobalJournalGuard, Journal};
/// use std::sync::Arc;
///
/// {
///     let _guard = GlobalJournalGuard::install(Some(Arc::new(Journal::new())));
///     assert!(get_global_journal().is_some());
/// }
/// ```
pub struct GlobalJournalGuard {
    previous: Option<Arc<Journal>>,
    _exclusive: MutexGuard<'static, ()>,
}

impl GlobalJournalGuard {
    /// Installs `journal` (or clears the slot with `None`) until the guard drops.
    pub fn install(journal: Option<Arc<Journal>>) -> Self {
        let exclusive = INSTALL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = set_global_journal(journal);
        Self {
            previous,
            _exclusive: exclusive,
        }
    }
}

impl Drop for GlobalJournalGuard {
    fn drop(&mut self) {
        set_global_journal(self.previous.take());
    }
}
