//! Behavior every store must share.

use std::sync::Arc;

use photobooth_model::{sort_newest_first, EncodedImage, RecordPatch};
use photobooth_session_store::{JsonDirStore, MemoryStore, SessionStore};

async fn exercise(store: Arc<dyn SessionStore>) {
    let first = store
        .create("strip3", "normal", EncodedImage::png(vec![1]))
        .await
        .unwrap();
    let second = store
        .create("grid4", "vivid", EncodedImage::png(vec![2]))
        .await
        .unwrap();
    assert_ne!(first, second, "{}: ids must be unique", store.name());

    store
        .update(
            first,
            RecordPatch {
                composite: Some(EncodedImage::png(vec![7, 7])),
                filter_id: Some("warm".into()),
            },
        )
        .await
        .unwrap();

    let mut records = store.list_all().await.unwrap();
    sort_newest_first(&mut records);
    assert_eq!(records.len(), 2);
    let updated = records.iter().find(|r| r.id == first).unwrap();
    assert_eq!(updated.filter_id, "warm");
    assert_eq!(updated.composite.bytes, vec![7, 7]);
    assert_eq!(updated.layout_id, "strip3");

    store.delete(second).await.unwrap();
    assert_eq!(store.list_all().await.unwrap().len(), 1);

    store.clear_all().await.unwrap();
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_store_contract() {
    exercise(Arc::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn json_dir_store_contract() {
    let dir = std::env::temp_dir().join(format!("photobooth-contract-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let store = JsonDirStore::open(&dir).await.unwrap();
    exercise(Arc::new(store)).await;
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn json_dir_store_serializes_concurrent_creates() {
    let dir = std::env::temp_dir().join(format!("photobooth-concurrent-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let store = Arc::new(JsonDirStore::open(&dir).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .create("single", "normal", EncodedImage::png(vec![i]))
                .await
                .unwrap()
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(store.list_all().await.unwrap().len(), 8);

    std::fs::remove_dir_all(&dir).ok();
}
