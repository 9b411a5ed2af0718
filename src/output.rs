//! Terminal output and progress reporting.
//!
//! All user-facing messages go through this module so styling stays in one
//! place. Messages are presentation only; the ledger itself never prints.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Styled terminal output for organize and undo runs.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Green checkmark line for a completed step.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Red cross line on stderr for a failure.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Yellow warning line for a non-fatal problem.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Cyan informational line.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Progress bar whose length is set once the file count is known.
    ///
    /// The caller feeds it `(processed, total)` updates from the ledger's
    /// progress callback.
    pub fn progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} files")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints how many files landed in each `extension/date` bucket.
    pub fn bucket_table(buckets: &BTreeMap<String, usize>, total_moved: usize) {
        Self::header("Destination folders");

        let width = buckets
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("Folder".len());

        println!("{:<width$} | {}", "Folder".bold(), "Files".bold());
        println!("{}", "-".repeat(width + 10));
        for (bucket, count) in buckets {
            println!(
                "{:<width$} | {}",
                bucket,
                count.to_string().green(),
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {}",
            "Total".bold(),
            total_moved.to_string().green().bold(),
        );
    }
}
