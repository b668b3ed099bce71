//! Record persistence and draft snapshot traits.

use super::schema::RecordKind;
use super::transport::TransportPayload;
use crate::error::Result;
use async_trait::async_trait;

/// Remote record store for the content wizards.
///
/// Implementations talk to the record API; this crate never retries a call.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Loads a stored record for editing.
    ///
    /// # Arguments
    ///
    /// * `kind` - The record type (berita, laporan, biografi)
    /// * `id` - The server-assigned record id
    ///
    /// # Returns
    ///
    /// - `Ok(Some(payload))`: Record found
    /// - `Ok(None)`: Record not found
    /// - `Err(_)`: The request failed
    async fn get(&self, kind: RecordKind, id: &str) -> Result<Option<TransportPayload>>;

    /// Creates a record.
    ///
    /// # Returns
    ///
    /// - `Ok(id)`: The server-assigned id of the new record
    /// - `Err(_)`: The record was not stored
    async fn create(&self, kind: RecordKind, payload: &TransportPayload) -> Result<String>;

    /// Overwrites an existing record.
    async fn update(&self, kind: RecordKind, id: &str, payload: &TransportPayload) -> Result<()>;
}

/// Local store for unsaved wizard drafts, keyed by session.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, key: &str, snapshot: &str) -> Result<()>;

    /// # Returns
    ///
    /// - `Ok(Some(json))`: A snapshot exists for `key`
    /// - `Ok(None)`: Nothing stored
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Removes the snapshot; clearing a missing key is not an error.
    async fn clear(&self, key: &str) -> Result<()>;
}
