//! Configuration service.
//!
//! Loads `AlumniConfig` from `config.toml`, writing a default file on first
//! run, and caches the result.

use crate::paths::AlumniPaths;
use crate::storage::{AtomicFile, StorageError};
use alumni_core::config::AlumniConfig;
use alumni_core::{AlumniError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicFile<AlumniConfig>>,
    /// Cached configuration, filled on first access
    config: Arc<RwLock<Option<AlumniConfig>>>,
}

impl ConfigService {
    /// Uses `<config_dir>/config.toml` from `paths`.
    pub fn new(paths: &AlumniPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| AlumniError::config(e.to_string()))?;
        Ok(Self::at(path))
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the configuration, loading it from disk if not cached.
    ///
    /// A missing or blank file is replaced with the defaults. A malformed
    /// file is an error and is left untouched.
    pub fn get_config(&self) -> Result<AlumniConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load_or_create()?;
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Applies `f` to the stored configuration and refreshes the cache.
    pub fn update<F>(&self, f: F) -> Result<AlumniConfig>
    where
        F: FnOnce(&mut AlumniConfig),
    {
        let updated = self.file.update(AlumniConfig::default(), |config| {
            f(config);
            Ok(())
        })?;
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = Some(updated.clone());
        tracing::info!("[Config] saved {}", self.path().display());
        Ok(updated)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn load_or_create(&self) -> std::result::Result<AlumniConfig, StorageError> {
        if let Some(config) = self.file.load()? {
            tracing::debug!("[Config] loaded {}", self.path().display());
            return Ok(config);
        }
        let defaults = AlumniConfig::default();
        self.file.save(&defaults)?;
        tracing::info!(
            "[Config] wrote default configuration to {}",
            self.path().display()
        );
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alumni_core::form::SummaryPolicy;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new(&AlumniPaths::new(Some(dir.path().to_path_buf()))).unwrap();

        let config = service.get_config().unwrap();
        assert_eq!(config, AlumniConfig::default());
        assert!(dir.path().join("config.toml").exists());
    }

    #[test]
    fn reads_partial_file_and_caches_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[comments]\nmax_depth = 3\n").unwrap();
        let service = ConfigService::at(path.clone());

        assert_eq!(service.get_config().unwrap().comments.max_depth, 3);

        std::fs::write(&path, "[comments]\nmax_depth = 1\n").unwrap();
        assert_eq!(service.get_config().unwrap().comments.max_depth, 3);
        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().comments.max_depth, 1);
    }

    #[test]
    fn update_persists_and_refreshes_cache() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::at(dir.path().join("config.toml"));
        service.get_config().unwrap();

        service
            .update(|c| c.wizard.summary_policy = SummaryPolicy::KeepManualEdits)
            .unwrap();

        assert_eq!(
            service.get_config().unwrap().wizard.summary_policy,
            SummaryPolicy::KeepManualEdits
        );
        let reloaded = ConfigService::at(dir.path().join("config.toml"));
        assert_eq!(
            reloaded.get_config().unwrap().wizard.summary_policy,
            SummaryPolicy::KeepManualEdits
        );
    }

    #[test]
    fn malformed_file_is_reported_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[wizard\n").unwrap();

        let err = ConfigService::at(path.clone()).get_config().unwrap_err();
        assert!(matches!(err, AlumniError::Serialization { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[wizard\n");
    }
}
