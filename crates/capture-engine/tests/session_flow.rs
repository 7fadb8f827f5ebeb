//! End-to-end capture sessions against the real renderer and a directory
//! store.

use std::sync::Arc;

use photobooth_capture_engine::{
    BoothSession, CameraProvider, CaptureOutcome, FnCameraProvider, FrameSource, SessionSettings,
    SessionState, SyntheticSource,
};
use photobooth_model::{EncodedFormat, FilterId, LayoutId};
use photobooth_render_engine::{CompositeRenderer, ExportOptions};
use photobooth_session_store::{JsonDirStore, SessionStore};

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("photobooth-flow-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn webcam_stand_in() -> Arc<dyn CameraProvider> {
    Arc::new(FnCameraProvider::new("synthetic", || {
        Ok(Box::new(SyntheticSource::new(1280, 720)) as Box<dyn FrameSource>)
    }))
}

#[tokio::test]
async fn strip3_session_produces_one_saved_composite() {
    let dir = temp_dir("strip3");
    let store = Arc::new(JsonDirStore::open(&dir).await.unwrap());
    let session = BoothSession::new(
        webcam_stand_in(),
        store.clone(),
        CompositeRenderer::default(),
        SessionSettings::instant(),
    );

    session.start_session(LayoutId::Strip3).await.unwrap();
    let mut outcomes = Vec::new();
    for _ in 0..3 {
        outcomes.push(session.request_capture().await.unwrap());
    }
    assert_eq!(outcomes[0], CaptureOutcome::Captured { index: 0 });
    assert_eq!(outcomes[1], CaptureOutcome::Captured { index: 1 });
    assert!(matches!(outcomes[2], CaptureOutcome::Completed { record_id: Some(_) }));

    assert_eq!(session.state(), SessionState::Completing);
    assert_eq!(session.shot_count(), 3);
    assert_eq!(session.composite().unwrap().dimensions(), (520, 1188));

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].layout_id, "strip3");
    assert_eq!(records[0].filter_id, "normal");
    let stored = image::load_from_memory(&records[0].composite.bytes).unwrap();
    assert_eq!((stored.width(), stored.height()), (520, 1188));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn result_view_filter_and_export_update_the_same_record() {
    let dir = temp_dir("result-view");
    let store = Arc::new(JsonDirStore::open(&dir).await.unwrap());
    let session = BoothSession::new(
        webcam_stand_in(),
        store.clone(),
        CompositeRenderer::default(),
        SessionSettings::instant(),
    );

    session.start_session(LayoutId::Grid4).await.unwrap();
    while session.state() == SessionState::Active {
        session.request_capture().await.unwrap();
    }
    let id = session.saved_record_id().unwrap();

    session.set_filter(FilterId::Sepia).await.unwrap();
    let jpeg = session.export(ExportOptions::jpeg(0.92)).await.unwrap();
    assert_eq!(jpeg.format, EncodedFormat::Jpeg);

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].filter_id, "sepia");
    assert_eq!(records[0].composite.format, EncodedFormat::Jpeg);
    assert!(dir.join(format!("{id}.jpg")).exists());

    std::fs::remove_dir_all(&dir).ok();
}
