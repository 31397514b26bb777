//! Reading journals back and checking their structure.

use crate::entry::{
    ContextControl, EntryKind, Fields, CONTROL_KEY, LEVEL_KEY, THREAD_KEY, TIMESTAMP_KEY,
    TITLE_KEY, TYPE_KEY,
};
use crate::error::{JournalError, Result};
use crate::record_stream::RecordInputStream;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Iterates the entries of a journal in write order.
pub struct JournalReader<R: BufRead> {
    frames: RecordInputStream<R>,
    index: usize,
}

impl<R: BufRead> JournalReader<R> {
    /// Reads entries from `source`.
    pub fn new(source: R) -> Self {
        Self {
            frames: RecordInputStream::new(source),
            index: 0,
        }
    }
}

impl JournalReader<BufReader<File>> {
    /// Reads entries from the journal file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for JournalReader<R> {
    type Item = Result<Fields>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frames.next()?;
        let index = self.index;
        self.index += 1;

        Some(frame.and_then(|text| match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(JournalError::MalformedRecord {
                index,
                reason: format!("expected a JSON object, got {}", other),
            }),
            Err(e) => Err(JournalError::MalformedRecord {
                index,
                reason: e.to_string(),
            }),
        }))
    }
}

/// Reads every entry from `source`.
pub fn read_entries<R: BufRead>(source: R) -> Result<Vec<Fields>> {
    JournalReader::new(source).collect()
}

/// A context END with no open context on its thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedEnd {
    /// Position of the END entry.
    pub index: usize,
    /// Thread that wrote it.
    pub thread: String,
}

/// A context BEGIN with no END by the end of the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnclosedContext {
    /// Position of the BEGIN entry.
    pub index: usize,
    /// Thread that wrote it.
    pub thread: String,
    /// Context title.
    pub title: String,
}

/// Result of [`verify_entries`].
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Total number of entries checked.
    pub entries_checked: usize,

    /// Entries per `_thread`.
    pub threads: BTreeMap<String, usize>,

    /// Indexes of entries whose timestamp is lower than the previous entry's.
    pub timestamp_regressions: Vec<usize>,

    /// Indexes of entries missing `_type`, `_timestamp` or `_thread`, or
    /// carrying an unknown `_type`.
    pub missing_fields: Vec<usize>,

    /// END entries with nothing to close.
    pub unmatched_ends: Vec<UnmatchedEnd>,

    /// BEGIN entries never closed.
    pub unclosed_contexts: Vec<UnclosedContext>,
}

impl VerifyReport {
    /// Returns true if any issues were found.
    pub fn has_issues(&self) -> bool {
        !self.timestamp_regressions.is_empty()
            || !self.missing_fields.is_empty()
            || !self.unmatched_ends.is_empty()
            || !self.unclosed_contexts.is_empty()
    }

    /// Returns a summary message.
    pub fn summary(&self) -> String {
        if !self.has_issues() {
            format!(
                "Journal is well-formed. {} entries from {} threads.",
                self.entries_checked,
                self.threads.len()
            )
        } else {
            let mut issues = Vec::new();
            if !self.timestamp_regressions.is_empty() {
                issues.push(format!(
                    "{} timestamp regressions",
                    self.timestamp_regressions.len()
                ));
            }
            if !self.missing_fields.is_empty() {
                issues.push(format!("{} malformed entries", self.missing_fields.len()));
            }
            if !self.unmatched_ends.is_empty() {
                issues.push(format!("{} unmatched ENDs", self.unmatched_ends.len()));
            }
            if !self.unclosed_contexts.is_empty() {
                issues.push(format!(
                    "{} unclosed contexts",
                    self.unclosed_contexts.len()
                ));
            }
            format!("Journal has issues: {}", issues.join(", "))
        }
    }
}

/// Checks the structural invariants of a replayed journal.
///
/// Timestamps must be non-decreasing in stream order, every entry must carry
/// the reserved keys, and context markers must pair up per thread.
pub fn verify_entries(entries: &[Fields]) -> VerifyReport {
    let mut report = VerifyReport::default();
    let mut open: HashMap<String, Vec<(usize, String)>> = HashMap::new();
    let mut last_timestamp: Option<u64> = None;

    for (index, entry) in entries.iter().enumerate() {
        report.entries_checked += 1;

        let kind = entry
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(EntryKind::parse);
        let timestamp = entry.get(TIMESTAMP_KEY).and_then(Value::as_u64);
        let thread = entry.get(THREAD_KEY).and_then(Value::as_str);

        let (Some(kind), Some(timestamp), Some(thread)) = (kind, timestamp, thread) else {
            report.missing_fields.push(index);
            continue;
        };

        *report.threads.entry(thread.to_string()).or_default() += 1;

        if last_timestamp.is_some_and(|last| timestamp < last) {
            report.timestamp_regressions.push(index);
        }
        last_timestamp = Some(timestamp);

        if kind != EntryKind::ContextControl {
            continue;
        }
        let control = entry
            .get(CONTROL_KEY)
            .and_then(Value::as_str)
            .and_then(ContextControl::parse);
        match control {
            Some(ContextControl::Begin) => {
                let title = entry
                    .get(TITLE_KEY)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                open.entry(thread.to_string()).or_default().push((index, title));
            }
            Some(ContextControl::End) => {
                let closed = open.get_mut(thread).and_then(Vec::pop);
                if closed.is_none() {
                    report.unmatched_ends.push(UnmatchedEnd {
                        index,
                        thread: thread.to_string(),
                    });
                }
            }
            None => report.missing_fields.push(index),
        }
    }

    for (thread, stack) in open {
        for (index, title) in stack {
            report.unclosed_contexts.push(UnclosedContext {
                index,
                thread: thread.clone(),
                title,
            });
        }
    }
    report.unclosed_contexts.sort_by_key(|c| c.index);
    report
}

/// Per-journal counts, as printed by `journal stats`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JournalStats {
    /// Entries by `_type`.
    pub by_type: BTreeMap<String, usize>,
    /// Messages by `_level`.
    pub by_level: BTreeMap<String, usize>,
    /// Entries by `_thread`.
    pub by_thread: BTreeMap<String, usize>,
    /// First and last `_timestamp`.
    pub time_span: Option<(u64, u64)>,
}

/// Counts entries by type, level and thread.
pub fn journal_stats(entries: &[Fields]) -> JournalStats {
    let mut stats = JournalStats::default();
    for entry in entries {
        let text = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);

        if let Some(kind) = text(TYPE_KEY) {
            *stats.by_type.entry(kind).or_default() += 1;
        }
        if let Some(level) = text(LEVEL_KEY) {
            *stats.by_level.entry(level).or_default() += 1;
        }
        if let Some(thread) = text(THREAD_KEY) {
            *stats.by_thread.entry(thread).or_default() += 1;
        }
        if let Some(ts) = entry.get(TIMESTAMP_KEY).and_then(Value::as_u64) {
            stats.time_span = Some(match stats.time_span {
                Some((first, last)) => (first.min(ts), last.max(ts)),
                None => (ts, ts),
            });
        }
    }
    stats
}
