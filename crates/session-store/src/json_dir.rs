//! Directory-backed store.
//!
//! Layout on disk:
//!
//! ```text
//! <root>/
//! ├── sessions.json   # manifest: next id + record metadata
//! ├── 1.png           # composite of record 1
//! └── 2.jpg
//! ```
//!
//! All mutations go through one async mutex, so concurrent calls from the
//! session core and the CLI never interleave manifest writes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{EncodedFormat, EncodedImage, RecordId, RecordPatch, SessionRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::store::{missing, SessionStore};

const MANIFEST_FILE: &str = "sessions.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Manifest {
    next_id: u64,
    #[serde(default)]
    records: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestEntry {
    id: RecordId,
    timestamp: DateTime<Utc>,
    layout_id: String,
    filter_id: String,
    #[serde(default)]
    format: EncodedFormat,
}

impl ManifestEntry {
    fn file_name(&self) -> String {
        composite_file_name(self.id, self.format)
    }
}

fn composite_file_name(id: RecordId, format: EncodedFormat) -> String {
    format!("{id}.{}", format.extension())
}

fn io_failure(action: &str, path: &Path, err: impl std::fmt::Display) -> BoothError {
    BoothError::persistence(format!("{action} {}: {err}", path.display()))
}

/// Stores records as files in a directory.
#[derive(Debug)]
pub struct JsonDirStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl JsonDirStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> BoothResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| io_failure("create store dir", &root, e))?;
        tracing::debug!(root = %root.display(), "opened session store");
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    async fn read_manifest(&self) -> BoothResult<Manifest> {
        let path = self.manifest_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json).map_err(|e| io_failure("parse", &path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Manifest::default()),
            Err(e) => Err(io_failure("read", &path, e)),
        }
    }

    /// Write via a temp file and rename so a crash never leaves a torn
    /// manifest.
    async fn write_manifest(&self, manifest: &Manifest) -> BoothResult<()> {
        let path = self.manifest_path();
        let tmp = self.root.join(format!("{MANIFEST_FILE}.tmp"));
        let json = serde_json::to_string_pretty(manifest)
            .map_err(|e| io_failure("serialize", &path, e))?;
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_failure("write", &tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_failure("replace", &path, e))
    }

    async fn write_composite(&self, id: RecordId, composite: &EncodedImage) -> BoothResult<()> {
        let path = self.root.join(composite_file_name(id, composite.format));
        tokio::fs::write(&path, &composite.bytes)
            .await
            .map_err(|e| io_failure("write", &path, e))
    }

    async fn remove_file_if_present(&self, name: &str) -> BoothResult<()> {
        let path = self.root.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_failure("remove", &path, e)),
        }
    }

    async fn load_record(&self, entry: ManifestEntry) -> BoothResult<SessionRecord> {
        let path = self.root.join(entry.file_name());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| io_failure("read", &path, e))?;
        Ok(SessionRecord {
            id: entry.id,
            timestamp: entry.timestamp,
            layout_id: entry.layout_id,
            filter_id: entry.filter_id,
            composite: EncodedImage {
                format: entry.format,
                bytes,
            },
        })
    }
}

#[async_trait]
impl SessionStore for JsonDirStore {
    async fn create(
        &self,
        layout_id: &str,
        filter_id: &str,
        composite: EncodedImage,
    ) -> BoothResult<RecordId> {
        let _guard = self.lock.lock().await;
        let mut manifest = self.read_manifest().await?;

        manifest.next_id += 1;
        let id = RecordId(manifest.next_id);
        self.write_composite(id, &composite).await?;
        manifest.records.push(ManifestEntry {
            id,
            timestamp: Utc::now(),
            layout_id: layout_id.to_string(),
            filter_id: filter_id.to_string(),
            format: composite.format,
        });
        self.write_manifest(&manifest).await?;

        tracing::info!(%id, layout_id, filter_id, "saved session record");
        Ok(id)
    }

    async fn list_all(&self) -> BoothResult<Vec<SessionRecord>> {
        let _guard = self.lock.lock().await;
        let manifest = self.read_manifest().await?;
        let mut records = Vec::with_capacity(manifest.records.len());
        for entry in manifest.records {
            let id = entry.id;
            match self.load_record(entry).await {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(%id, error = %e, "skipping unreadable record"),
            }
        }
        Ok(records)
    }

    async fn update(&self, id: RecordId, patch: RecordPatch) -> BoothResult<()> {
        let _guard = self.lock.lock().await;
        let mut manifest = self.read_manifest().await?;
        let index = manifest
            .records
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| missing(id))?;

        if let Some(composite) = &patch.composite {
            let old_name = manifest.records[index].file_name();
            self.write_composite(id, composite).await?;
            manifest.records[index].format = composite.format;
            if manifest.records[index].file_name() != old_name {
                self.remove_file_if_present(&old_name).await?;
            }
        }
        if let Some(filter_id) = patch.filter_id {
            manifest.records[index].filter_id = filter_id;
        }
        self.write_manifest(&manifest).await?;

        tracing::debug!(%id, "updated session record");
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> BoothResult<()> {
        let _guard = self.lock.lock().await;
        let mut manifest = self.read_manifest().await?;
        let index = manifest
            .records
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| missing(id))?;
        let entry = manifest.records.remove(index);
        self.write_manifest(&manifest).await?;
        self.remove_file_if_present(&entry.file_name()).await?;

        tracing::info!(%id, "deleted session record");
        Ok(())
    }

    async fn clear_all(&self) -> BoothResult<()> {
        let _guard = self.lock.lock().await;
        let mut manifest = self.read_manifest().await?;
        let entries = std::mem::take(&mut manifest.records);
        // Ids keep increasing across a clear.
        self.write_manifest(&manifest).await?;
        for entry in &entries {
            self.remove_file_if_present(&entry.file_name()).await?;
        }

        tracing::info!(count = entries.len(), "cleared session records");
        Ok(())
    }

    fn name(&self) -> &str {
        "json-dir"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "photobooth-store-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_create_then_list_from_fresh_handle() {
        let dir = temp_store_dir("reopen");
        let store = JsonDirStore::open(&dir).await.unwrap();
        let id = store
            .create("strip3", "sepia", EncodedImage::png(vec![1, 2, 3]))
            .await
            .unwrap();
        assert!(dir.join("1.png").exists());
        drop(store);

        let reopened = JsonDirStore::open(&dir).await.unwrap();
        let records = reopened.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].layout_id, "strip3");
        assert_eq!(records[0].composite.bytes, vec![1, 2, 3]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_update_switching_format_replaces_file() {
        let dir = temp_store_dir("format");
        let store = JsonDirStore::open(&dir).await.unwrap();
        let id = store
            .create("grid4", "normal", EncodedImage::png(vec![9]))
            .await
            .unwrap();
        store
            .update(
                id,
                RecordPatch {
                    composite: Some(EncodedImage {
                        format: EncodedFormat::Jpeg,
                        bytes: vec![0xff, 0xd8],
                    }),
                    filter_id: Some("duotone".into()),
                },
            )
            .await
            .unwrap();

        assert!(!dir.join("1.png").exists());
        assert!(dir.join("1.jpg").exists());
        let record = store.get(id).await.unwrap();
        assert_eq!(record.filter_id, "duotone");
        assert_eq!(record.composite.format, EncodedFormat::Jpeg);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_ids_survive_clear() {
        let dir = temp_store_dir("clear");
        let store = JsonDirStore::open(&dir).await.unwrap();
        store.create("single", "normal", EncodedImage::png(vec![])).await.unwrap();
        store.create("single", "normal", EncodedImage::png(vec![])).await.unwrap();
        store.clear_all().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        assert!(!dir.join("1.png").exists());

        let id = store.create("single", "normal", EncodedImage::png(vec![])).await.unwrap();
        assert_eq!(id, RecordId(3));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_unknown_id_is_persistence_failure() {
        let dir = temp_store_dir("missing");
        let store = JsonDirStore::open(&dir).await.unwrap();
        let err = store.delete(RecordId(42)).await.unwrap_err();
        assert!(matches!(err, BoothError::PersistenceFailure { .. }));
        let err = store.update(RecordId(42), RecordPatch::default()).await.unwrap_err();
        assert!(matches!(err, BoothError::PersistenceFailure { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_corrupt_manifest_is_reported() {
        let dir = temp_store_dir("corrupt");
        let store = JsonDirStore::open(&dir).await.unwrap();
        std::fs::write(dir.join(MANIFEST_FILE), "{ not json").unwrap();
        assert!(store.list_all().await.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
