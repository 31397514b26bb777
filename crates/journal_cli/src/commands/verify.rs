//! Journal verification command.

use super::load_entries;
use anyhow::Result;
use console::style;
use journal_core::verify_entries;
use std::path::Path;

/// Check timestamps, reserved keys and context pairing.
pub fn run(file: &Path) -> Result<()> {
    let entries = load_entries(file)?;
    let report = verify_entries(&entries);

    println!("{}", style("Verification Report:").bold());
    println!(
        "  Entries checked:       {}",
        style(report.entries_checked).cyan()
    );
    println!(
        "  Threads:               {}",
        style(report.threads.len()).cyan()
    );

    if !report.missing_fields.is_empty() {
        println!(
            "  Malformed entries:     {}",
            style(report.missing_fields.len()).red()
        );
        for index in &report.missing_fields {
            println!("    {} entry #{}", style("×").red(), index);
        }
    }
    if !report.timestamp_regressions.is_empty() {
        println!(
            "  Timestamp regressions: {}",
            style(report.timestamp_regressions.len()).red()
        );
        for index in &report.timestamp_regressions {
            println!("    {} entry #{}", style("×").red(), index);
        }
    }
    if !report.unmatched_ends.is_empty() {
        println!(
            "  Unmatched ENDs:        {}",
            style(report.unmatched_ends.len()).yellow()
        );
        for end in &report.unmatched_ends {
            println!(
                "    {} entry #{} on {}",
                style("⚠").yellow(),
                end.index,
                end.thread
            );
        }
    }
    if !report.unclosed_contexts.is_empty() {
        println!(
            "  Unclosed contexts:     {}",
            style(report.unclosed_contexts.len()).yellow()
        );
        for context in &report.unclosed_contexts {
            println!(
                "    {} entry #{} on {}: {}",
                style("⚠").yellow(),
                context.index,
                context.thread,
                context.title
            );
        }
    }

    println!();
    if report.has_issues() {
        println!("{}", style(&report.summary()).yellow().bold());
        if !report.unclosed_contexts.is_empty() {
            println!();
            println!("{}", style("Recommendations:").bold());
            println!(
                "  {} Unclosed contexts usually mean the writer was killed mid-run",
                style("→").cyan()
            );
        }
        anyhow::bail!("journal verification failed");
    }

    println!(
        "{} {}",
        style("✓").green(),
        style(&report.summary()).green()
    );
    Ok(())
}
