//! Configuration for journals and the `journal` tool.

use crate::error::{JournalError, Result};
use crate::payload::DEFAULT_FORMAT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up by [`Config::load`].
pub const CONFIG_FILE_NAME: &str = "journal.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Journal output settings.
    #[serde(default)]
    pub journal: JournalSettings,

    /// Diagnostic logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from `journal.toml` in `dir`.
    ///
    /// A missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| JournalError::ConfigError(format!("failed to read config: {}", e)))?;
            Self::from_toml_str(&content)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| JournalError::ConfigError(format!("failed to parse config: {}", e)))
    }

    /// Save configuration to `journal.toml` in `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| JournalError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| JournalError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Journal output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JournalSettings {
    /// Default journal file, used when no path is given explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Flush the sink after every entry (default: true).
    /// Needed when several writers interleave into one file.
    pub flush_each_entry: bool,

    /// Take an exclusive advisory lock on journal files (default: true).
    pub lock_file: bool,

    /// `format` written on messages whose payload doesn't name one (default: "pre").
    pub default_format: String,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            path: None,
            flush_each_entry: true,
            lock_file: true,
            default_format: DEFAULT_FORMAT.to_string(),
        }
    }
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset (default: "warn").
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}
