//! Command-line interface for tidydate.
//!
//! Handles argument parsing, the dry-run listing, organize orchestration,
//! and the end-of-run undo offer. Undo history lives only in memory, so the
//! offer comes right after the run instead of as a separate invocation.

use crate::classifier;
use crate::config::{CollisionPolicy, ExclusionSet, SessionConfig};
use crate::ledger::{MoveLedger, MoveRecord, OrganizeReport, UndoOutcome};
use crate::output::OutputFormatter;
use clap::Parser;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "tidydate",
    version,
    about = "Move a directory's files into extension/date subfolders, with undo and an operation log"
)]
pub struct Cli {
    /// Directory whose files will be organized
    pub path: PathBuf,

    /// Comma-separated file names to leave untouched
    #[arg(short = 'x', long, value_name = "NAMES")]
    pub exclude: Option<String>,

    /// Behavior when a destination file already exists
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,

    /// Operation log file (appended, never truncated)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List planned moves without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Exit after the run without offering to undo it
    #[arg(long)]
    pub no_undo_prompt: bool,
}

/// Entry point for the binary; errors are rendered for the user.
///
/// # Arguments
///
/// * `cli` - Parsed command-line arguments
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use tidydate::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["tidydate", "/path/to/dir", "--dry-run"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("{}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let mut config = SessionConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    if let Some(path) = &cli.log_file {
        config.log_path = path.clone();
    }
    if let Some(policy) = cli.on_collision {
        config.on_collision = policy;
    }

    let exclusions = match &cli.exclude {
        Some(csv) => ExclusionSet::from_csv(csv),
        None => config.exclude.iter().cloned().collect(),
    };

    if cli.dry_run {
        dry_run(&cli.path, &exclusions)
    } else {
        organize_and_offer_undo(cli, &config, &exclusions)
    }
}

/// Shows where every eligible file would go, without moving anything.
fn dry_run(base_path: &Path, exclusions: &ExclusionSet) -> Result<(), String> {
    OutputFormatter::info(&format!(
        "DRY RUN: analyzing contents of: {}",
        base_path.display()
    ));

    let outcome = MoveLedger::scan(base_path, exclusions).map_err(|e| format!("Error: {}", e))?;
    for (path, reason) in &outcome.failed {
        OutputFormatter::warning(&format!("Cannot read {}: {}", path.display(), reason));
    }
    if outcome.files.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for file in &outcome.files {
        let destination = classifier::classify(base_path, file);
        let relative = destination
            .strip_prefix(base_path)
            .unwrap_or(&destination)
            .to_path_buf();
        OutputFormatter::plain(&format!(" - {} → {}", file.name, relative.display()));
        if let Some(folder) = relative.parent() {
            *buckets.entry(folder.display().to_string()).or_insert(0) += 1;
        }
    }

    OutputFormatter::bucket_table(&buckets, outcome.files.len());
    OutputFormatter::success("Dry run complete. No files were modified.");
    Ok(())
}

fn organize_and_offer_undo(
    cli: &Cli,
    config: &SessionConfig,
    exclusions: &ExclusionSet,
) -> Result<(), String> {
    OutputFormatter::info(&format!("Organizing contents of: {}", cli.path.display()));

    let mut ledger = MoveLedger::new(config);
    let pb = OutputFormatter::progress_bar();
    let report = ledger
        .organize(&cli.path, exclusions, |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })
        .map_err(|e| format!("Error: {}", e))?;
    pb.finish_and_clear();

    print_organize_report(&report);
    if report.moved > 0 {
        OutputFormatter::bucket_table(&bucket_counts(&cli.path, ledger.history()), report.moved);
    }
    OutputFormatter::plain(&format!(
        "Log appended to: {}",
        ledger.logbook().path().display()
    ));

    if cli.no_undo_prompt || ledger.history().is_empty() {
        return Ok(());
    }

    if confirm("Undo this run? [y/N]: ")? {
        print_undo_outcome(ledger.undo_last());
    }
    Ok(())
}

fn print_organize_report(report: &OrganizeReport) {
    if report.total == 0 {
        OutputFormatter::plain("No files found to organize.");
        return;
    }

    OutputFormatter::success(&format!(
        "Moved {} of {} file(s)",
        report.moved, report.total
    ));
    for (path, reason) in &report.skipped {
        OutputFormatter::warning(&format!("Skipped {}: {}", path.display(), reason));
    }
    for (path, reason) in &report.failed {
        OutputFormatter::error(&format!("Failed to move {}: {}", path.display(), reason));
    }
    if !report.failed.is_empty() {
        OutputFormatter::warning("Some files could not be organized. See errors above.");
    }
}

fn print_undo_outcome(outcome: UndoOutcome) {
    match outcome {
        UndoOutcome::NothingToUndo => OutputFormatter::info("Nothing to undo."),
        UndoOutcome::Undone(report) => {
            OutputFormatter::success(&format!("Restored {} file(s)", report.restored));
            if report.removed_folders > 0 {
                OutputFormatter::plain(&format!(
                    "Removed {} empty folder(s)",
                    report.removed_folders
                ));
            }
            for (path, reason) in &report.failed {
                OutputFormatter::error(&format!(
                    "Failed to restore {}: {}",
                    path.display(),
                    reason
                ));
            }
        }
    }
}

/// Counts this run's moved files per `extension/date` folder.
fn bucket_counts(base_path: &Path, history: &[MoveRecord]) -> BTreeMap<String, usize> {
    let mut buckets = BTreeMap::new();
    for record in history {
        if let Some(folder) = record.moved_to.parent() {
            let relative = folder.strip_prefix(base_path).unwrap_or(folder);
            *buckets.entry(relative.display().to_string()).or_insert(0) += 1;
        }
    }
    buckets
}

/// Blocking yes/no question on the controlling terminal.
fn confirm(prompt: &str) -> Result<bool, String> {
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|e| format!("Error writing prompt: {}", e))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| format!("Error reading answer: {}", e))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
