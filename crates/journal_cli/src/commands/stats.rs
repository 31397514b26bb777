//! Journal statistics command.

use super::{format_micros, load_entries};
use anyhow::Result;
use console::style;
use journal_core::journal_stats;
use std::path::Path;

/// Show entry counts by type, level and thread.
pub fn run(file: &Path) -> Result<()> {
    let entries = load_entries(file)?;
    let stats = journal_stats(&entries);

    println!("{}", style("Journal Statistics:").bold());
    println!("  Entries:  {}", style(entries.len()).cyan());
    if let Some((first, last)) = stats.time_span {
        println!("  First:    {}", format_micros(first));
        println!("  Last:     {}", format_micros(last));
        println!(
            "  Span:     {:.3}s",
            (last - first) as f64 / 1_000_000.0
        );
    }

    println!();
    println!("{}", style("By type:").bold());
    for (kind, count) in &stats.by_type {
        println!("  {:<24} {}", kind, style(count).cyan());
    }

    if !stats.by_level.is_empty() {
        println!();
        println!("{}", style("By level:").bold());
        for (level, count) in &stats.by_level {
            println!("  {:<24} {}", level, style(count).cyan());
        }
    }

    println!();
    println!("{}", style("By thread:").bold());
    for (thread, count) in &stats.by_thread {
        println!("  {:<24} {}", thread, style(count).cyan());
    }

    Ok(())
}
