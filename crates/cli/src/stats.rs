//! Per-mapping status lines and the run summary

use dotweave_engine::{ReconciliationOutcome, SyncCounts, SyncEntry};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Write one status line for a processed mapping
///
/// # Errors
///
/// Returns error if writing fails
pub fn write_entry<W: Write + ?Sized>(writer: &mut W, entry: &SyncEntry, dry_run: bool) -> io::Result<()> {
    let label = match &entry.target {
        Some(target) => format!("{} {} {target}", entry.mapping.source_name, "→".dimmed()),
        None => entry.mapping.source_name.clone(),
    };

    match &entry.outcome {
        ReconciliationOutcome::Written => {
            let verb = if dry_run { "would write" } else { "written" };
            writeln!(writer, "{} {label} {}", "●".bright_green(), verb.dimmed())
        }
        ReconciliationOutcome::Unchanged => {
            writeln!(writer, "{} {label} {}", "●".dimmed(), "unchanged".dimmed())
        }
        ReconciliationOutcome::Conflict => {
            writeln!(writer, "{} {label} {}", "●".bright_yellow(), "conflict".yellow())
        }
        ReconciliationOutcome::Skipped(reason) => {
            writeln!(writer, "{} {label} {}", "●".bright_yellow(), "skipped".yellow())?;
            writeln!(writer, "  {}", reason.dimmed())
        }
        ReconciliationOutcome::Failed(reason) => {
            writeln!(writer, "{} {label} {}", "●".bright_red(), "failed".red())?;
            writeln!(writer, "  {}", reason.red())
        }
    }
}

/// Write the run summary
///
/// # Errors
///
/// Returns error if writing fails
pub fn write_summary<W: Write + ?Sized>(writer: &mut W, counts: &SyncCounts, dry_run: bool) -> io::Result<()> {
    let written = if dry_run { "would be written" } else { "written" };

    write!(
        writer,
        "{} {} {written}, {} unchanged, {} skipped, {} failed",
        "●".bright_green(),
        counts.written.to_string().bright_green().bold(),
        counts.unchanged.to_string().bold(),
        counts.skipped.to_string().bright_yellow().bold(),
        counts.failed.to_string().bright_red().bold(),
    )?;

    if counts.conflicts > 0 {
        write!(
            writer,
            ", {} in conflict",
            counts.conflicts.to_string().bright_yellow().bold()
        )?;
    }

    writeln!(writer)
}
