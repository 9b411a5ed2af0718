//! tidydate - organize a directory's files into extension/date subfolders
//!
//! This library scans the immediate children of a directory, computes each
//! file's destination as `<extension>/<MM-DD-YYYY>/<name>`, moves it there,
//! and keeps an in-memory ledger so the run can be undone within the same
//! process. Every move, undo step, and folder removal appends one line to a
//! plain-text operation log.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod ledger;
pub mod logbook;
pub mod output;

pub use classifier::{FileEntry, NO_EXTENSION, classify};
pub use config::{CollisionPolicy, ConfigError, ExclusionSet, SessionConfig};
pub use ledger::{
    LedgerError, MoveLedger, MoveRecord, OrganizeReport, ScanOutcome, UndoOutcome, UndoReport,
};
pub use logbook::Logbook;

pub use cli::{Cli, run_cli};
