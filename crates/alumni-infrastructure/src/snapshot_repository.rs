//! File-backed draft snapshot store.

use crate::paths::AlumniPaths;
use crate::storage::{StorageError, read_text, write_atomic};
use alumni_core::form::SnapshotStore;
use alumni_core::{AlumniError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Stores each wizard draft as `<dir>/<key>.json`.
///
/// Keys are sanitised to `[A-Za-z0-9_-]` so they cannot escape the
/// directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Uses the platform snapshots directory.
    pub fn from_paths(paths: &AlumniPaths) -> Result<Self> {
        let dir = paths
            .snapshots_dir()
            .map_err(|e| AlumniError::config(e.to_string()))?;
        Ok(Self::new(dir))
    }

    fn file_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AlumniError::internal(format!("snapshot task failed: {e}")))?
        .map_err(AlumniError::from)
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, key: &str, snapshot: &str) -> Result<()> {
        let path = self.file_for(key);
        let bytes = snapshot.as_bytes().to_vec();
        tracing::debug!("[Snapshot] writing {}", path.display());
        blocking(move || write_atomic(&path, &bytes)).await
    }

    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.file_for(key);
        blocking(move || read_text(&path)).await
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let path = self.file_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("[Snapshot] removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
