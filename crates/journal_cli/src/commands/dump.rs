//! Journal dump command.

use super::{format_micros, load_entries};
use anyhow::Result;
use console::style;
use journal_core::{
    ContextControl, EntryKind, Fields, CONTROL_KEY, LEVEL_KEY, THREAD_KEY, TIMESTAMP_KEY,
    TITLE_KEY, TYPE_KEY, VALUE_KEY,
};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Print every entry, raw or as a timeline.
pub fn run(file: &Path, pretty: bool) -> Result<()> {
    let entries = load_entries(file)?;

    if !pretty {
        for entry in &entries {
            println!("{}", serde_json::to_string(entry)?);
        }
        return Ok(());
    }

    // Indentation follows each thread's own context nesting
    let mut depth: HashMap<String, usize> = HashMap::new();
    for entry in &entries {
        let thread = text(entry, THREAD_KEY).unwrap_or("?");
        let time = entry
            .get(TIMESTAMP_KEY)
            .and_then(Value::as_u64)
            .map(format_micros)
            .unwrap_or_default();
        let level = depth.entry(thread.to_string()).or_default();

        let kind = text(entry, TYPE_KEY).and_then(EntryKind::parse);
        let control = text(entry, CONTROL_KEY).and_then(ContextControl::parse);
        let line = match (kind, control) {
            (Some(EntryKind::ContextControl), Some(ContextControl::Begin)) => {
                let line = format!(
                    "{}{} {}",
                    indent(*level),
                    style("▶").cyan(),
                    style(text(entry, TITLE_KEY).unwrap_or_default()).bold()
                );
                *level += 1;
                line
            }
            (Some(EntryKind::ContextControl), Some(ContextControl::End)) => {
                *level = level.saturating_sub(1);
                format!("{}{}", indent(*level), style("◀").cyan())
            }
            (Some(EntryKind::Message), _) => {
                let severity = text(entry, LEVEL_KEY).unwrap_or_default();
                format!(
                    "{}{} {}",
                    indent(*level),
                    styled_level(severity),
                    text(entry, VALUE_KEY).unwrap_or_default()
                )
            }
            _ => format!(
                "{}{} {}",
                indent(*level),
                style("?").red(),
                serde_json::to_string(entry)?
            ),
        };

        println!("{} {} {}", style(time).dim(), style(thread).dim(), line);
    }

    Ok(())
}

fn text<'a>(entry: &'a Fields, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn styled_level(level: &str) -> String {
    let padded = format!("{:<5}", level);
    match level {
        "ERROR" => style(padded).red().to_string(),
        "WARN" => style(padded).yellow().to_string(),
        "INFO" => style(padded).green().to_string(),
        _ => style(padded).dim().to_string(),
    }
}
