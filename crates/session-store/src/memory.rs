//! In-process store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{EncodedImage, RecordId, RecordPatch, SessionRecord};

use crate::store::{missing, SessionStore};

/// Keeps records in memory. Can be switched into a failing mode to exercise
/// persistence-failure handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Inner>,
    failing: AtomicBool,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    records: BTreeMap<RecordId, SessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `create` calls, including failed ones.
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Number of `update` calls, including failed ones.
    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> BoothResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BoothError::persistence("memory store is set to fail"));
        }
        Ok(())
    }

    fn lock(&self) -> BoothResult<std::sync::MutexGuard<'_, Inner>> {
        self.records
            .lock()
            .map_err(|_| BoothError::persistence("memory store lock poisoned"))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(
        &self,
        layout_id: &str,
        filter_id: &str,
        composite: EncodedImage,
    ) -> BoothResult<RecordId> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut inner = self.lock()?;
        inner.next_id += 1;
        let id = RecordId(inner.next_id);
        inner.records.insert(
            id,
            SessionRecord {
                id,
                timestamp: Utc::now(),
                layout_id: layout_id.to_string(),
                filter_id: filter_id.to_string(),
                composite,
            },
        );
        Ok(id)
    }

    async fn list_all(&self) -> BoothResult<Vec<SessionRecord>> {
        self.check()?;
        Ok(self.lock()?.records.values().cloned().collect())
    }

    async fn update(&self, id: RecordId, patch: RecordPatch) -> BoothResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut inner = self.lock()?;
        let record = inner.records.get_mut(&id).ok_or_else(|| missing(id))?;
        if let Some(composite) = patch.composite {
            record.composite = composite;
        }
        if let Some(filter_id) = patch.filter_id {
            record.filter_id = filter_id;
        }
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> BoothResult<()> {
        self.check()?;
        self.lock()?
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing(id))
    }

    async fn clear_all(&self) -> BoothResult<()> {
        self.check()?;
        self.lock()?.records.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
