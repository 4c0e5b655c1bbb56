//! Store location configuration.
//!
//! # Responsibility
//! - Resolve where the place file lives for the current user.
//! - Allow hosts and tests to pin the location explicitly.
//!
//! # Invariants
//! - The file name is fixed; only the directory varies.
//! - An explicit `NOFEAR_DATA_DIR` always wins over platform defaults.

use directories::ProjectDirs;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Fixed name of the backing file inside the data directory.
pub const SAVE_FILE_NAME: &str = "SavedPlaces";
/// Environment override for the data directory.
pub const DATA_DIR_ENV: &str = "NOFEAR_DATA_DIR";

const QUALIFIER: &str = "app";
const ORGANIZATION: &str = "nofear";
const APPLICATION: &str = "NoFearList";

/// Resolved location of the place file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
}

impl StoreConfig {
    /// Uses `dir` as the data directory with the fixed file name.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: dir.as_ref().to_path_buf(),
            file_name: SAVE_FILE_NAME.to_string(),
        }
    }

    /// Resolves from `NOFEAR_DATA_DIR`, then the platform data directory.
    ///
    /// # Errors
    /// - Returns `ConfigError::NoHomeDirectory` when neither source yields a
    ///   directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(raw) = std::env::var(DATA_DIR_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Ok(Self::in_dir(trimmed));
            }
        }

        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(ConfigError::NoHomeDirectory)?;
        Ok(Self::in_dir(dirs.data_dir()))
    }

    pub fn save_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoHomeDirectory,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHomeDirectory => write!(
                f,
                "could not resolve a data directory; set {DATA_DIR_ENV}"
            ),
        }
    }
}

impl Error for ConfigError {}
