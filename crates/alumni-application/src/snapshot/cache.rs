use alumni_core::error::Result;
use alumni_core::form::SnapshotStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory draft snapshot store.
///
/// Keeps snapshots for the lifetime of the process only. Used when no
/// writable data directory is available, and in tests.
#[derive(Clone)]
pub struct MemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySnapshotStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            snapshots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }

    /// Removes every stored snapshot.
    pub async fn clear_all(&self) {
        let mut snapshots = self.snapshots.write().await;
        snapshots.clear();
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, key: &str, snapshot: &str) -> Result<()> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(key.to_string(), snapshot.to_string());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(key).cloned())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.remove(key);
        Ok(())
    }
}
