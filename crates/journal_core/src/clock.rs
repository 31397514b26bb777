//! Timestamp sources for journal entries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the `_timestamp` of each journal entry.
///
/// Implementations must be non-decreasing: `now()` never returns a value
/// smaller than one it returned before, even when called from several
/// threads at once.
pub trait Clock: Send + Sync {
    /// Returns the current timestamp in microseconds.
    fn now(&self) -> u64;
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn now(&self) -> u64 {
        self()
    }
}

/// Wall-clock time in microseconds since the Unix epoch, clamped so it
/// never goes backwards when the system clock is adjusted.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    /// Creates a new system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        let previous = self.last.fetch_max(wall, Ordering::SeqCst);
        previous.max(wall)
    }
}

/// Deterministic clock that advances by one on every call.
///
/// ```
/// use journal_core::{Clock, SteppingClock};
///
/// let clock = SteppingClock::starting_at(100);
/// assert_eq!(clock.now(), 101);
/// assert_eq!(clock.now(), 102);
/// assert_eq!(clock.last_time(), 102);
/// ```
#[derive(Debug, Default)]
pub struct SteppingClock {
    current: AtomicU64,
}

impl SteppingClock {
    /// Creates a clock whose first `now()` returns `start + 1`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            current: AtomicU64::new(start),
        }
    }

    /// The value most recently returned by `now()` (or the start value).
    pub fn last_time(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }
}
