//! Run a capture session end to end.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use photobooth_capture_engine::webcam::WebcamProvider;
use photobooth_capture_engine::{
    BoothSession, CameraProvider, CaptureOutcome, FnCameraProvider, FrameSource, SessionEvent,
    SessionSettings, SessionState, StillImageSource, SyntheticSource,
};
use photobooth_common::config::AppConfig;
use photobooth_common::error::BoothError;
use photobooth_model::{EncodedFormat, FilterId, LayoutId};
use photobooth_render_engine::CompositeRenderer;
use photobooth_session_store::{JsonDirStore, MemoryStore, SessionStore};
use tokio::sync::broadcast::error::RecvError;

use crate::SourceArgs;

/// Retries for a camera that has not produced its first frame yet.
const NOT_READY_RETRIES: u32 = 10;

pub struct ShootOptions {
    pub layout: Option<LayoutId>,
    pub filter: Option<FilterId>,
    pub source: SourceArgs,
    pub output: Option<PathBuf>,
    pub format: EncodedFormat,
    pub quality: Option<f32>,
    pub instant: bool,
    pub save: bool,
}

fn camera_provider(config: &AppConfig, source: SourceArgs) -> Arc<dyn CameraProvider> {
    if let Some(path) = source.source {
        let name = path.display().to_string();
        return Arc::new(FnCameraProvider::new(name, move || {
            StillImageSource::open(&path).map(|s| Box::new(s) as Box<dyn FrameSource>)
        }));
    }
    if source.synthetic {
        return Arc::new(FnCameraProvider::new("synthetic", || {
            Ok(Box::new(SyntheticSource::default()) as Box<dyn FrameSource>)
        }));
    }
    Arc::new(WebcamProvider::new(
        source.device.or_else(|| config.capture.device.clone()),
    ))
}

async fn session_store(config: &AppConfig, save: bool) -> anyhow::Result<Arc<dyn SessionStore>> {
    if save {
        Ok(Arc::new(JsonDirStore::open(&config.store_dir).await?))
    } else {
        Ok(Arc::new(MemoryStore::new()))
    }
}

pub async fn run(config: &AppConfig, options: ShootOptions) -> anyhow::Result<()> {
    let mut settings = SessionSettings::from_config(&config.capture)?;
    if options.instant {
        settings.tick = Duration::ZERO;
        settings.completion_delay = Duration::ZERO;
    }
    let layout = options.layout.unwrap_or(settings.default_layout);
    let filter = options.filter.unwrap_or(settings.default_filter);

    let session = BoothSession::new(
        camera_provider(config, options.source),
        session_store(config, options.save).await?,
        CompositeRenderer::from_config(&config.composite)?,
        settings,
    );

    let printer = tokio::spawn(print_events(session.subscribe()));

    println!("Starting session: {}", layout.layout().caption());
    session.start_session(layout).await?;
    session.set_filter(filter).await?;

    let mut not_ready = 0;
    while session.state() == SessionState::Active {
        println!("{}", session.counter_label());
        match session.request_capture().await {
            Ok(CaptureOutcome::Completed { record_id }) => {
                match record_id {
                    Some(id) => println!("Saved session #{id}"),
                    None if options.save => match session.save().await {
                        Ok(id) => println!("Saved session #{id} on retry"),
                        Err(e) => eprintln!("Session was not saved: {e}"),
                    },
                    None => {}
                }
                break;
            }
            Ok(outcome) => tracing::debug!(?outcome, "capture finished"),
            Err(BoothError::SourceNotReady { message }) if not_ready < NOT_READY_RETRIES => {
                not_ready += 1;
                tracing::debug!(%message, attempt = not_ready, "camera not ready, retrying");
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            Err(e) => {
                session.abandon()?;
                return Err(e.into());
            }
        }
    }

    let export_options = super::export_options(config, options.format, options.quality);
    let encoded = session.export(export_options).await?;
    let path = super::output_path(options.output, &session.download_file_name(options.format));
    tokio::fs::write(&path, &encoded.bytes).await?;
    println!("Wrote {} ({} bytes)", path.display(), encoded.bytes.len());

    session.abandon()?;
    drop(session);
    printer.abort();
    Ok(())
}

async fn print_events(mut rx: tokio::sync::broadcast::Receiver<SessionEvent>) {
    loop {
        match rx.recv().await {
            Ok(SessionEvent::CountdownTick { remaining }) => println!("  {remaining}..."),
            Ok(SessionEvent::ShotCaptured { index, total }) => {
                println!("  Click! Shot {} of {total}", index + 1)
            }
            Ok(SessionEvent::Notice(message)) => eprintln!("  ! {message}"),
            Ok(event) => tracing::debug!(?event, "session event"),
            Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "event printer lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
