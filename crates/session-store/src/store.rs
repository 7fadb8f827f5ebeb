//! The store boundary.

use async_trait::async_trait;
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{EncodedImage, RecordId, RecordPatch, SessionRecord};

/// Durable storage for session records.
///
/// Every failure is reported as [`BoothError::PersistenceFailure`]; callers
/// treat it as non-fatal.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new record and return its store-assigned id.
    async fn create(
        &self,
        layout_id: &str,
        filter_id: &str,
        composite: EncodedImage,
    ) -> BoothResult<RecordId>;

    /// Every record, in no particular order.
    async fn list_all(&self) -> BoothResult<Vec<SessionRecord>>;

    /// Replace the fields present in `patch`.
    async fn update(&self, id: RecordId, patch: RecordPatch) -> BoothResult<()>;

    async fn delete(&self, id: RecordId) -> BoothResult<()>;

    async fn clear_all(&self) -> BoothResult<()>;

    /// Human-readable store name for logs.
    fn name(&self) -> &str;

    async fn get(&self, id: RecordId) -> BoothResult<SessionRecord> {
        self.list_all()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| missing(id))
    }
}

pub(crate) fn missing(id: RecordId) -> BoothError {
    BoothError::persistence(format!("no record with id {id}"))
}
