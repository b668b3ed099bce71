//! Platform paths for alumni configuration, logs and draft snapshots.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/alumni/            # Config directory
//! ├── config.toml              # Application configuration
//! └── logs/                    # Daily rolling logs
//!     └── alumni.log.YYYY-MM-DD
//!
//! ~/.local/share/alumni/       # Data directory
//! └── snapshots/               # Unsaved wizard drafts, one JSON file each
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "alumni";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Cannot determine the platform {0} directory")]
    DirNotFound(&'static str),
}

/// Resolves every file location used by the infrastructure adapters.
///
/// With a base directory (tests, portable installs) config and data share
/// that root; otherwise the platform directories from `dirs` are used.
#[derive(Debug, Clone, Default)]
pub struct AlumniPaths {
    base: Option<PathBuf>,
}

impl AlumniPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/alumni/`
    /// - `Err(PathError::DirNotFound)`: No config directory on this platform
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        self.resolve(dirs::config_dir(), "config")
    }

    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.local/share/alumni/`
    /// - `Err(PathError::DirNotFound)`: No data directory on this platform
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        self.resolve(dirs::data_dir(), "data")
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    pub fn snapshots_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("snapshots"))
    }

    fn resolve(&self, platform: Option<PathBuf>, kind: &'static str) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => platform
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::DirNotFound(kind)),
        }
    }
}

/// Creates `dir` (and its parents) when missing.
pub(crate) fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
