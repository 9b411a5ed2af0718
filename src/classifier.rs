//! Destination classification for files being organized.
//!
//! A file's destination is derived from nothing but its base name and its
//! creation time: `<directory>/<extension>/<MM-DD-YYYY>/<name>`. Files whose
//! name carries no extension bucket under the literal folder name
//! `No Extension`. Classification is pure; the filesystem is only touched when
//! a [`FileEntry`] is built from a live directory entry.

use chrono::{DateTime, Local};
use std::fs::DirEntry;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Folder name used for files whose name has no extension.
pub const NO_EXTENSION: &str = "No Extension";

/// A regular file that is a candidate for organization.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Base file name.
    pub name: String,
    /// Absolute path of the file at scan time.
    pub source_path: PathBuf,
    /// Platform-reported creation time, falling back to the modification
    /// time on filesystems that do not record a birth time.
    pub created: SystemTime,
}

impl FileEntry {
    /// Builds an entry from a directory entry that is already known to be a
    /// regular file.
    pub fn from_dir_entry(entry: &DirEntry) -> io::Result<Self> {
        let metadata = entry.metadata()?;
        let created = metadata.created().or_else(|_| metadata.modified())?;
        Ok(Self {
            name: entry.file_name().to_string_lossy().to_string(),
            source_path: entry.path(),
            created,
        })
    }
}

/// Returns the extension bucket for a base file name.
///
/// The bucket is the substring after the last `.`, with case preserved.
/// Names without a dot, names whose only dot leads (`.bashrc`), and names
/// ending in a dot all fall into [`NO_EXTENSION`].
pub fn extension_bucket(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => &name[idx + 1..],
        _ => NO_EXTENSION,
    }
}

/// Formats a timestamp as a `MM-DD-YYYY` folder name in local time.
pub fn date_bucket(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%m-%d-%Y").to_string()
}

/// Computes the destination path for a file within `directory`.
///
/// Identical `(directory, name, created)` inputs always yield the identical
/// destination; nothing is read from or written to the filesystem.
pub fn classify(directory: &Path, entry: &FileEntry) -> PathBuf {
    directory
        .join(extension_bucket(&entry.name))
        .join(date_bucket(entry.created))
        .join(&entry.name)
}
