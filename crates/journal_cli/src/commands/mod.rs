//! CLI commands.

pub mod dump;
pub mod run;
pub mod stats;
pub mod verify;

use anyhow::{Context, Result};
use chrono::DateTime;
use journal_core::{read_entries, Fields};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read every entry of the journal at `path`.
pub(crate) fn load_entries(path: &Path) -> Result<Vec<Fields>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open journal {}", path.display()))?;
    let entries = read_entries(BufReader::new(file))?;
    Ok(entries)
}

/// Render a `_timestamp` (microseconds since the epoch) as UTC wall-clock time.
pub(crate) fn format_micros(micros: u64) -> String {
    i64::try_from(micros)
        .ok()
        .and_then(DateTime::from_timestamp_micros)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
        .unwrap_or_else(|| micros.to_string())
}
