//! Terminal output: colored status lines, the progress bar and run summaries.
//!
//! Everything the user sees on the terminal goes through [`OutputFormatter`];
//! the action log is written separately by the tracing subscriber.

use crate::cli::Plan;
use crate::file_organizer::{FailureKind, FileOutcome, Report};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use desktidy::output::OutputFormatter;
    /// OutputFormatter::success("Desktop organized");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// A progress bar over `total` files.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints one line per file as it is handled, above the progress bar.
    pub fn file_outcome(pb: &ProgressBar, outcome: FileOutcome<'_>) {
        match outcome {
            FileOutcome::Moved(moved) => {
                let marker = if moved.disambiguated { " (renamed)" } else { "" };
                pb.println(format!(
                    "{} {} → {}{}",
                    "✓".green(),
                    file_name(&moved.source),
                    file_name(&moved.destination),
                    marker.yellow()
                ));
            }
            FileOutcome::Failed(failed) => {
                pb.println(format!("{} {}", "✗".red(), failed.reason));
            }
        }
    }

    /// Prints the outcome of a real run.
    pub fn report_summary(report: &Report) {
        Self::header("SUMMARY");
        println!("Destination: {}", report.destination.display());
        println!(
            "Moved:   {} {}",
            report.moved.len().to_string().green().bold(),
            files_word(report.moved.len())
        );

        let renamed = report.moved.iter().filter(|m| m.disambiguated).count();
        if renamed > 0 {
            println!(
                "Renamed: {} {} to avoid name clashes",
                renamed.to_string().yellow(),
                files_word(renamed)
            );
        }

        if report.failed.is_empty() {
            return;
        }

        println!(
            "Failed:  {} {}",
            report.failed.len().to_string().red().bold(),
            files_word(report.failed.len())
        );
        for failed in &report.failed {
            let kind = match failed.kind {
                FailureKind::Vanished => "vanished",
                FailureKind::InvalidName => "invalid name",
                FailureKind::Transient => "error",
            };
            eprintln!("  - {} [{}]: {}", failed.source.display(), kind, failed.reason);
        }
    }

    /// Prints what a dry run would do.
    pub fn plan(plan: &Plan) {
        Self::dry_run_notice(&format!("Destination: {}", plan.destination.display()));
        if plan.creates_root {
            Self::dry_run_notice("Would create the category folder");
        }
        if plan.creates_day {
            Self::dry_run_notice("Would create today's folder");
        }

        if plan.moves.is_empty() {
            Self::info("No files found to organize.");
            return;
        }

        Self::header("Files would be moved as follows:");
        for planned in &plan.moves {
            let marker = if planned.disambiguated { " (renamed)" } else { "" };
            println!(
                " - {} → {}{}",
                file_name(&planned.source),
                file_name(&planned.destination),
                marker.yellow()
            );
        }

        println!("\nTotal: {} {}", plan.moves.len(), files_word(plan.moves.len()));
        Self::success("Dry run complete. No files were modified.");
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn files_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
