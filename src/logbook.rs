//! Append-only text log of move, undo, and cleanup events.
//!
//! Every event is one human-readable line. The file is opened in append mode
//! for each write and the handle is released before returning, so the log is
//! never truncated and no handle is held across operations. The file grows
//! without bound; rotation is left to the user.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writer for the plain-text operation log.
#[derive(Debug, Clone)]
pub struct Logbook {
    path: PathBuf,
}

impl Logbook {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line, creating the file if it does not exist yet.
    ///
    /// Callers performing a move or undo ignore the returned error: a failed
    /// log write loses that line only and never aborts the operation it
    /// describes.
    pub fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}
