//! Session configuration: exclusions, collision policy, and log location.
//!
//! Settings come from an optional TOML file, looked up in this order:
//! 1. An explicitly supplied path
//! 2. `.tidydaterc.toml` in the current directory
//! 3. `~/.config/tidydate/config.toml`
//! 4. Built-in defaults
//!
//! # Configuration File Format
//!
//! ```toml
//! log_path = "/home/user/organize.log"
//! on_collision = "skip"
//! exclude = ["Thumbs.db", ".DS_Store"]
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// What to do when a file's computed destination already exists.
///
/// The historical behavior is `Overwrite` (last write wins); `Skip` and
/// `Fail` both leave the source file in place, differing only in whether the
/// outcome counts as a skip or a failure in the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing destination file.
    #[default]
    Overwrite,
    /// Leave the source file where it is and report it as skipped.
    Skip,
    /// Leave the source file where it is and report it as a failure.
    Fail,
}

/// File names to leave untouched during an organize run.
///
/// Matching is exact string equality against the base name, never a glob,
/// pattern, or path match. Folder names may be present in the set but have no
/// effect, since only regular files are ever candidates.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet(HashSet<String>);

impl ExclusionSet {
    /// Parses a comma-separated list such as `"skip.txt, notes"`.
    ///
    /// Entries are trimmed; empty entries are dropped, so an empty or
    /// all-whitespace input yields an empty set (organize everything).
    pub fn from_csv(input: &str) -> Self {
        Self(
            input
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<String> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Raw shape of the TOML configuration file; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    log_path: Option<PathBuf>,
    on_collision: Option<CollisionPolicy>,
    #[serde(default)]
    exclude: Vec<String>,
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where operation log lines are appended.
    pub log_path: PathBuf,
    /// Destination-collision behavior.
    pub on_collision: CollisionPolicy,
    /// Default exclusions from the configuration file.
    pub exclude: Vec<String>,
}

impl SessionConfig {
    /// Loads configuration, falling back to defaults when no file is found.
    ///
    /// # Errors
    ///
    /// Returns an error only when a file is present but unreadable or invalid,
    /// or when an explicitly supplied path does not exist.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".tidydaterc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("tidydate")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let raw: ConfigFile =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;

        Ok(Self {
            log_path: raw.log_path.unwrap_or_else(default_log_path),
            on_collision: raw.on_collision.unwrap_or_default(),
            exclude: raw.exclude,
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            on_collision: CollisionPolicy::default(),
            exclude: Vec::new(),
        }
    }
}

/// Default per-user log location, kept compatible with earlier releases.
pub fn default_log_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join("FileOrganizer_log.txt"),
        Err(_) => PathBuf::from("FileOrganizer_log.txt"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn csv_entries_are_trimmed() {
        let set = ExclusionSet::from_csv("skip.txt , notes,  backup.zip");
        assert!(set.contains("skip.txt"));
        assert!(set.contains("notes"));
        assert!(set.contains("backup.zip"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn blank_csv_yields_empty_set() {
        assert!(ExclusionSet::from_csv("").is_empty());
        assert!(ExclusionSet::from_csv("  , ,").is_empty());
    }

    #[test]
    fn matching_is_exact_not_prefix() {
        let set = ExclusionSet::from_csv("skip.txt");
        assert!(set.contains("skip.txt"));
        assert!(!set.contains("skip2.txt"));
        assert!(!set.contains("skip"));
    }

    #[test]
    fn default_collision_policy_is_overwrite() {
        assert_eq!(CollisionPolicy::default(), CollisionPolicy::Overwrite);
    }

    #[test]
    fn load_from_explicit_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "log_path = \"/tmp/organize.log\"\non_collision = \"skip\"\nexclude = [\"Thumbs.db\"]\n",
        )
        .expect("Failed to write config");

        let config = SessionConfig::load(Some(&path)).expect("Failed to load config");
        assert_eq!(config.log_path, PathBuf::from("/tmp/organize.log"));
        assert_eq!(config.on_collision, CollisionPolicy::Skip);
        assert_eq!(config.exclude, vec!["Thumbs.db".to_string()]);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "exclude = [\"notes\"]").expect("Failed to write config");

        let config = SessionConfig::load(Some(&path)).expect("Failed to load config");
        assert_eq!(config.on_collision, CollisionPolicy::Overwrite);
        assert_eq!(config.exclude, vec!["notes".to_string()]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = SessionConfig::load(Some(Path::new("/non/existent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "on_collision = [not toml").expect("Failed to write config");

        let result = SessionConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }
}
