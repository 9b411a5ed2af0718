//! Move ledger: performs classified moves, records them for reversal, and
//! prunes the folders an undone run leaves empty.
//!
//! The ledger's history lives only in memory for the duration of one run. It
//! is reset whenever a new organize run starts and drained by undo, so undo
//! can only ever reverse the most recent run within the same process. Both
//! `organize` and `undo_last` take `&mut self` and must not be invoked
//! concurrently; the type is meant to be driven from a single thread.

use crate::classifier::{self, FileEntry};
use crate::config::{CollisionPolicy, ExclusionSet, SessionConfig};
use crate::logbook::Logbook;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that abort a whole run before any file is touched.
///
/// Per-file failures never surface here; they are collected in the run
/// reports so the remaining files can still be processed.
#[derive(Debug)]
pub enum LedgerError {
    /// The target is missing or not a directory.
    InvalidDirectory { path: PathBuf },
    /// The directory listing itself failed.
    ReadDirFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDirectory { path } => {
                write!(f, "Not a directory: {}", path.display())
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Result type for whole-run ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// The reversible memory of one successful move.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    /// Destination the file was moved to.
    pub moved_to: PathBuf,
    /// Original location the file came from.
    pub moved_from: PathBuf,
}

/// Result of enumerating a directory's children.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Eligible regular files, in directory enumeration order.
    pub files: Vec<FileEntry>,
    /// Still-present children whose type or timestamps could not be read.
    pub failed: Vec<(PathBuf, String)>,
}

/// Outcome of one organize run.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Number of eligible files found.
    pub total: usize,
    /// Number of files successfully moved.
    pub moved: usize,
    /// Files left in place by the collision policy.
    pub skipped: Vec<(PathBuf, String)>,
    /// Files that could not be moved, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl OrganizeReport {
    /// True when every eligible file was moved.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Outcome of an undo request.
#[derive(Debug)]
pub enum UndoOutcome {
    /// History was empty; nothing was written to the filesystem.
    NothingToUndo,
    /// History was replayed (possibly with per-record failures) and cleared.
    Undone(UndoReport),
}

/// Details of a replayed undo.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Number of files moved back to their original location.
    pub restored: usize,
    /// Records that could not be restored, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Number of emptied date and extension folders removed.
    pub removed_folders: usize,
}

impl UndoReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Performs and records moves for one session.
pub struct MoveLedger {
    history: Vec<MoveRecord>,
    logbook: Logbook,
    on_collision: CollisionPolicy,
}

impl MoveLedger {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            history: Vec::new(),
            logbook: Logbook::new(config.log_path.clone()),
            on_collision: config.on_collision,
        }
    }

    /// Moves recorded by the current run, in move order.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn logbook(&self) -> &Logbook {
        &self.logbook
    }

    // A lost log line never aborts the operation it describes.
    fn log(&self, line: String) {
        let _ = self.logbook.append(&line);
    }

    /// Lists the immediate regular-file children of `directory` that are not
    /// excluded, in directory enumeration order.
    ///
    /// Subdirectories are never candidates, so exclusion entries naming
    /// folders simply never match anything. A child whose metadata cannot be
    /// read lands in [`ScanOutcome::failed`]; a child that vanished between
    /// listing and stat is dropped silently.
    pub fn scan(directory: &Path, exclusions: &ExclusionSet) -> LedgerResult<ScanOutcome> {
        if !directory.is_dir() {
            return Err(LedgerError::InvalidDirectory {
                path: directory.to_path_buf(),
            });
        }

        let entries = fs::read_dir(directory).map_err(|e| LedgerError::ReadDirFailed {
            path: directory.to_path_buf(),
            source: e,
        })?;

        let mut outcome = ScanOutcome::default();
        for entry in entries.flatten() {
            match entry.file_type() {
                Ok(file_type) if file_type.is_file() => {
                    match FileEntry::from_dir_entry(&entry) {
                        Ok(file) => {
                            if !exclusions.contains(&file.name) {
                                outcome.files.push(file);
                            }
                        }
                        Err(e) => note_scan_failure(&mut outcome.failed, entry.path(), &e),
                    }
                }
                Ok(_) => {}
                Err(e) => note_scan_failure(&mut outcome.failed, entry.path(), &e),
            }
        }
        Ok(outcome)
    }

    /// Organizes every eligible file in `directory` into its
    /// `<extension>/<MM-DD-YYYY>` subfolder.
    ///
    /// Any un-undone history from a previous run is discarded first. Each
    /// successful move appends a record and one `Moved {from} -> {to}` log
    /// line. A failure moving (or reading the metadata of) one file is
    /// recorded in the report and the run continues; it never aborts early.
    /// `on_progress` is called with `(processed, total)` after every file,
    /// success or not.
    ///
    /// # Arguments
    ///
    /// * `directory` - The directory whose immediate children are organized
    /// * `exclusions` - File names to leave untouched (exact match)
    /// * `on_progress` - Called with `(processed, total)` after each file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use tidydate::{ExclusionSet, MoveLedger, SessionConfig};
    ///
    /// let mut ledger = MoveLedger::new(&SessionConfig::default());
    /// let report = ledger
    ///     .organize(Path::new("/path/to/dir"), &ExclusionSet::default(), |done, total| {
    ///         println!("{}/{}", done, total);
    ///     })
    ///     .expect("organize failed");
    /// println!("Moved {} of {} file(s)", report.moved, report.total);
    /// ```
    pub fn organize(
        &mut self,
        directory: &Path,
        exclusions: &ExclusionSet,
        mut on_progress: impl FnMut(usize, usize),
    ) -> LedgerResult<OrganizeReport> {
        self.history.clear();

        let outcome = Self::scan(directory, exclusions)?;
        let mut report = OrganizeReport {
            total: outcome.files.len() + outcome.failed.len(),
            failed: outcome.failed,
            ..Default::default()
        };
        // Children that failed at scan time still count as processed.
        let unreadable = report.failed.len();

        for (idx, file) in outcome.files.iter().enumerate() {
            let destination = classifier::classify(directory, file);

            if destination.exists() {
                match self.on_collision {
                    CollisionPolicy::Overwrite => {}
                    CollisionPolicy::Skip => {
                        report.skipped.push((
                            file.source_path.clone(),
                            format!("destination {} already exists", destination.display()),
                        ));
                        on_progress(unreadable + idx + 1, report.total);
                        continue;
                    }
                    CollisionPolicy::Fail => {
                        report.failed.push((
                            file.source_path.clone(),
                            format!("destination {} already exists", destination.display()),
                        ));
                        on_progress(unreadable + idx + 1, report.total);
                        continue;
                    }
                }
            }

            let moved = destination
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|_| move_file(&file.source_path, &destination));

            match moved {
                Ok(()) => {
                    self.log(format!(
                        "Moved {} -> {}",
                        file.source_path.display(),
                        destination.display()
                    ));
                    self.history.push(MoveRecord {
                        moved_to: destination,
                        moved_from: file.source_path.clone(),
                    });
                    report.moved += 1;
                }
                Err(e) => {
                    report
                        .failed
                        .push((file.source_path.clone(), e.to_string()));
                }
            }
            on_progress(unreadable + idx + 1, report.total);
        }

        Ok(report)
    }

    /// Reverses the most recent organize run and prunes emptied folders.
    ///
    /// Records are replayed most-recent-first. Each move back logs one
    /// `Undo: {to} -> {from}` line; a record that cannot be restored is
    /// logged, reported, and skipped. Afterwards the date folders touched by
    /// the restored records are removed deepest-first if now empty, then
    /// their extension-folder parents likewise; removal failures are logged
    /// only. History is cleared unconditionally, so a partially failed undo
    /// is not retryable beyond what the log records.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use tidydate::{ExclusionSet, MoveLedger, SessionConfig, UndoOutcome};
    ///
    /// let mut ledger = MoveLedger::new(&SessionConfig::default());
    /// ledger.organize(Path::new("/path/to/dir"), &ExclusionSet::default(), |_, _| {})?;
    /// match ledger.undo_last() {
    ///     UndoOutcome::Undone(report) => println!("Restored {} file(s)", report.restored),
    ///     UndoOutcome::NothingToUndo => println!("Nothing to undo."),
    /// }
    /// # Ok::<(), tidydate::LedgerError>(())
    /// ```
    pub fn undo_last(&mut self) -> UndoOutcome {
        if self.history.is_empty() {
            return UndoOutcome::NothingToUndo;
        }

        let mut report = UndoReport::default();
        let mut folders_to_check: HashSet<PathBuf> = HashSet::new();

        for record in self.history.iter().rev() {
            match move_file(&record.moved_to, &record.moved_from) {
                Ok(()) => {
                    self.log(format!(
                        "Undo: {} -> {}",
                        record.moved_to.display(),
                        record.moved_from.display()
                    ));
                    if let Some(folder) = record.moved_to.parent() {
                        folders_to_check.insert(folder.to_path_buf());
                    }
                    report.restored += 1;
                }
                Err(e) => {
                    self.log(format!(
                        "Failed to undo {}: {}",
                        record.moved_to.display(),
                        e
                    ));
                    report.failed.push((record.moved_to.clone(), e.to_string()));
                }
            }
        }

        // Date folders before their extension parents.
        let mut folders: Vec<PathBuf> = folders_to_check.into_iter().collect();
        folders.sort_by_key(|p| std::cmp::Reverse(p.as_os_str().len()));

        for folder in folders {
            match remove_if_empty(&folder) {
                Ok(false) => {}
                Ok(true) => {
                    self.log(format!("Removed empty folder: {}", folder.display()));
                    report.removed_folders += 1;

                    if let Some(parent) = folder.parent() {
                        match remove_if_empty(parent) {
                            Ok(false) => {}
                            Ok(true) => {
                                self.log(format!(
                                    "Removed empty extension folder: {}",
                                    parent.display()
                                ));
                                report.removed_folders += 1;
                            }
                            Err(e) => self.log(format!(
                                "Failed to remove folder {}: {}",
                                parent.display(),
                                e
                            )),
                        }
                    }
                }
                Err(e) => self.log(format!(
                    "Failed to remove folder {}: {}",
                    folder.display(),
                    e
                )),
            }
        }

        self.history.clear();
        UndoOutcome::Undone(report)
    }
}

/// Records a child whose metadata could not be read. A child that vanished
/// between listing and stat is not an error and is dropped instead.
fn note_scan_failure(failed: &mut Vec<(PathBuf, String)>, path: PathBuf, err: &io::Error) {
    if err.kind() != io::ErrorKind::NotFound {
        failed.push((path, err.to_string()));
    }
}

/// Moves a file, falling back to copy + remove when rename fails (moves
/// across mount points).
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => match fs::copy(from, to).and_then(|_| fs::remove_file(from)) {
            Ok(()) => Ok(()),
            Err(_) => Err(rename_err),
        },
    }
}

/// Removes `path` if it exists and is an empty directory. Returns whether a
/// removal happened.
fn remove_if_empty(path: &Path) -> io::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    if fs::read_dir(path)?.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(path)?;
    Ok(true)
}
