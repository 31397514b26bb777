use anyhow::{Context, Result};
use journal_core::{Fields, JournalReader};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the scenario journal inside the workspace
pub const JOURNAL_FILE: &str = "journal.jsonl";

/// Manages isolated test environments with tempfile
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self { dir })
    }

    /// Get workspace path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the scenario journal
    pub fn journal_path(&self) -> PathBuf {
        self.path().join(JOURNAL_FILE)
    }

    /// Replay every entry of the scenario journal
    pub fn read_journal(&self) -> Result<Vec<Fields>> {
        let reader = JournalReader::open(self.journal_path())
            .with_context(|| format!("Failed to open {}", JOURNAL_FILE))?;
        let entries = reader
            .collect::<journal_core::Result<Vec<_>>>()
            .context("Failed to replay journal")?;
        Ok(entries)
    }

    /// Raw journal text
    pub fn journal_text(&self) -> Result<String> {
        fs::read_to_string(self.journal_path())
            .with_context(|| format!("Failed to read {}", JOURNAL_FILE))
    }
}
