//! Capture session state machine.
//!
//! A [`BoothSession`] owns one photobooth session from camera acquisition
//! to the saved composite:
//!
//! ```text
//!          start_session            last shot + delay
//!   Idle ───────────────▶ Active ───────────────────▶ Completing
//!    ▲                     │  ▲                          │
//!    │       abandon       │  └── retake / retake_all ───┤
//!    └─────────────────────┴─────────────────────────────┘
//! ```
//!
//! The handle is cheap to clone; all clones drive the same session. State
//! lives behind a synchronous mutex that is never held across an await.
//! Long-running work (countdown, frame grab, render, store calls) runs
//! unlocked and re-validates a generation counter before committing, so a
//! capture that finishes after the session was reset is dropped.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use image::RgbaImage;
use photobooth_common::config::CaptureDefaults;
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::{
    EncodedFormat, EncodedImage, FilterId, FilterSpec, Layout, LayoutId, RecordId, RecordPatch,
    Shot,
};
use photobooth_render_engine::{download_file_name, encode, CompositeRenderer, ExportOptions};
use photobooth_session_store::SessionStore;
use tokio::sync::broadcast;

use crate::camera::{CameraLease, CameraProvider};
use crate::capturer;
use crate::countdown::{Countdown, CountdownHandle, CountdownOutcome};

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Active,
    Completing,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Completing => "completing",
        })
    }
}

/// Published to presentation layers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(SessionState),
    CountdownTick { remaining: u32 },
    ShotCaptured { index: usize, total: usize },
    ShotRemoved { index: usize },
    LayoutChanged(LayoutId),
    FilterChanged(FilterId),
    /// A composite was rendered. `record_id` is `None` when persistence
    /// failed.
    CompositeReady { record_id: Option<RecordId> },
    /// Non-fatal problem worth showing to the user.
    Notice(String),
}

/// Result of [`BoothSession::request_capture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A shot was added; more are needed.
    Captured { index: usize },
    /// The last shot was added and the composite rendered.
    Completed { record_id: Option<RecordId> },
    /// Another capture was already in flight, or the layout is full.
    Ignored,
    /// The countdown was cancelled.
    Cancelled,
    /// The session was reset while this capture ran.
    Discarded,
}

/// Result of [`BoothSession::switch_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSwitch {
    Unchanged,
    Applied,
    Declined,
}

/// Pacing of the capture flow.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub countdown_steps: u32,
    pub tick: Duration,
    /// Pause between the last shot and the result view.
    pub completion_delay: Duration,
    pub default_filter: FilterId,
    pub default_layout: LayoutId,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            countdown_steps: 3,
            tick: Duration::from_secs(1),
            completion_delay: Duration::from_millis(400),
            default_filter: FilterId::Normal,
            default_layout: LayoutId::Strip3,
        }
    }
}

impl SessionSettings {
    /// Immediate countdown and completion, for headless runs and tests.
    pub fn instant() -> Self {
        Self {
            tick: Duration::ZERO,
            completion_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn from_config(config: &CaptureDefaults) -> BoothResult<Self> {
        Ok(Self {
            countdown_steps: config.countdown_steps,
            tick: Duration::from_millis(config.tick_ms),
            completion_delay: Duration::from_millis(config.completion_delay_ms),
            default_filter: config.default_filter.parse()?,
            default_layout: config.default_layout.parse()?,
        })
    }
}

/// Mutable session data.
#[derive(Debug)]
struct SessionContext {
    state: SessionState,
    layout: &'static Layout,
    filter: &'static FilterSpec,
    shots: Vec<Shot>,
    capture_in_flight: bool,
    saved_record_id: Option<RecordId>,
    /// Bumped whenever in-flight work must be invalidated.
    generation: u64,
    camera: Option<Arc<CameraLease>>,
    countdown: Option<CountdownHandle>,
    last_composite: Option<RgbaImage>,
}

impl SessionContext {
    fn new(settings: &SessionSettings) -> Self {
        Self {
            state: SessionState::Idle,
            layout: settings.default_layout.layout(),
            filter: settings.default_filter.spec(),
            shots: Vec::new(),
            capture_in_flight: false,
            saved_record_id: None,
            generation: 0,
            camera: None,
            countdown: None,
            last_composite: None,
        }
    }

    /// Cancel the countdown, invalidate in-flight work, and clear the flag.
    fn reset_capture(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }
        self.generation += 1;
        self.capture_in_flight = false;
    }

    fn release_camera(&mut self) {
        if let Some(camera) = self.camera.take() {
            camera.release();
        }
    }

    fn is_full(&self) -> bool {
        self.shots.len() >= self.layout.shot_count as usize
    }
}

/// Whether a render may create a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persist {
    CreateOrUpdate,
    UpdateOnly,
}

struct Shared {
    ctx: Mutex<SessionContext>,
    /// Serializes render + persist so a stale render never lands after a
    /// newer one.
    render_lock: tokio::sync::Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
    store: Arc<dyn SessionStore>,
    camera: Arc<dyn CameraProvider>,
    renderer: CompositeRenderer,
    settings: SessionSettings,
}

/// Handle to a photobooth session.
#[derive(Clone)]
pub struct BoothSession {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for BoothSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoothSession")
            .field("store", &self.shared.store.name())
            .field("camera", &self.shared.camera.name())
            .field("settings", &self.shared.settings)
            .finish_non_exhaustive()
    }
}

impl BoothSession {
    pub fn new(
        camera: Arc<dyn CameraProvider>,
        store: Arc<dyn SessionStore>,
        renderer: CompositeRenderer,
        settings: SessionSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                ctx: Mutex::new(SessionContext::new(&settings)),
                render_lock: tokio::sync::Mutex::new(()),
                events,
                store,
                camera,
                renderer,
                settings,
            }),
        }
    }

    /// Receive session events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.shared.settings
    }

    pub fn renderer(&self) -> &CompositeRenderer {
        &self.shared.renderer
    }

    fn lock(&self) -> BoothResult<MutexGuard<'_, SessionContext>> {
        self.shared
            .ctx
            .lock()
            .map_err(|_| BoothError::invalid_state("session lock poisoned"))
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.shared.events.send(event);
    }

    fn notice(&self, message: String) {
        self.emit(SessionEvent::Notice(message));
    }

    fn set_state(&self, ctx: &mut SessionContext, state: SessionState) {
        if ctx.state != state {
            tracing::info!(from = %ctx.state, to = %state, "session state changed");
            ctx.state = state;
            self.emit(SessionEvent::StateChanged(state));
        }
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.lock().map(|c| c.state).unwrap_or(SessionState::Idle)
    }

    pub fn layout(&self) -> &'static Layout {
        self.lock()
            .map(|c| c.layout)
            .unwrap_or_else(|_| self.shared.settings.default_layout.layout())
    }

    pub fn filter(&self) -> &'static FilterSpec {
        self.lock()
            .map(|c| c.filter)
            .unwrap_or_else(|_| self.shared.settings.default_filter.spec())
    }

    pub fn shots(&self) -> Vec<Shot> {
        self.lock().map(|c| c.shots.clone()).unwrap_or_default()
    }

    pub fn shot_count(&self) -> usize {
        self.lock().map(|c| c.shots.len()).unwrap_or(0)
    }

    pub fn is_capture_in_flight(&self) -> bool {
        self.lock().map(|c| c.capture_in_flight).unwrap_or(false)
    }

    pub fn saved_record_id(&self) -> Option<RecordId> {
        self.lock().ok().and_then(|c| c.saved_record_id)
    }

    /// Whether a camera lease is currently held.
    pub fn has_camera(&self) -> bool {
        self.lock().map(|c| c.camera.is_some()).unwrap_or(false)
    }

    /// `"Shot k+1 of N"` for the next capture.
    pub fn counter_label(&self) -> String {
        let (layout, taken) = self
            .lock()
            .map(|c| (c.layout, c.shots.len()))
            .unwrap_or((self.shared.settings.default_layout.layout(), 0));
        layout.counter_label(taken)
    }

    /// The last successfully rendered composite. A failed re-render keeps
    /// the previous one.
    pub fn composite(&self) -> Option<RgbaImage> {
        self.lock().ok().and_then(|c| c.last_composite.clone())
    }

    /// Suggested download name for today's export.
    pub fn download_file_name(&self, format: EncodedFormat) -> String {
        let product = self
            .shared
            .renderer
            .style()
            .watermark
            .as_ref()
            .map(|w| w.product_name.as_str())
            .unwrap_or("photobooth");
        download_file_name(product, Local::now().date_naive(), format)
    }

    // ── Commands ───────────────────────────────────────────────

    /// Acquire the camera and begin a fresh session with `layout`.
    ///
    /// Legal from any state. If the camera cannot be opened the session
    /// ends up `Idle` and the error is returned.
    pub async fn start_session(&self, layout: LayoutId) -> BoothResult<()> {
        let lease = match self.shared.camera.acquire().await {
            Ok(lease) => lease,
            Err(e) => {
                tracing::warn!(error = %e, "camera acquisition failed");
                let mut ctx = self.lock()?;
                ctx.reset_capture();
                ctx.release_camera();
                ctx.shots.clear();
                self.set_state(&mut ctx, SessionState::Idle);
                drop(ctx);
                if e.is_user_visible() {
                    self.notice(e.to_string());
                }
                return Err(e);
            }
        };

        let mut ctx = self.lock()?;
        ctx.reset_capture();
        ctx.release_camera();
        ctx.camera = Some(Arc::new(lease));
        ctx.layout = layout.layout();
        ctx.filter = self.shared.settings.default_filter.spec();
        ctx.shots.clear();
        ctx.saved_record_id = None;
        ctx.last_composite = None;
        tracing::info!(layout = %layout, "session started");
        self.set_state(&mut ctx, SessionState::Active);
        Ok(())
    }

    /// Count down, grab a frame, and append it as the next shot.
    ///
    /// Returns [`CaptureOutcome::Ignored`] without side effects when a
    /// capture is already running or the layout is full. The in-flight flag
    /// is cleared on every exit path.
    pub async fn request_capture(&self) -> BoothResult<CaptureOutcome> {
        let (generation, countdown, camera) = {
            let mut ctx = self.lock()?;
            if ctx.state != SessionState::Active {
                return Err(BoothError::invalid_state(format!(
                    "cannot capture while {}",
                    ctx.state
                )));
            }
            if ctx.capture_in_flight || ctx.is_full() {
                tracing::debug!(
                    in_flight = ctx.capture_in_flight,
                    shots = ctx.shots.len(),
                    "capture request ignored"
                );
                return Ok(CaptureOutcome::Ignored);
            }
            let camera = ctx
                .camera
                .clone()
                .ok_or_else(|| BoothError::source_unavailable("no camera lease"))?;
            let (countdown, handle) =
                Countdown::new(self.shared.settings.countdown_steps, self.shared.settings.tick);
            ctx.capture_in_flight = true;
            ctx.countdown = Some(handle);
            (ctx.generation, countdown, camera)
        };

        let outcome = countdown
            .run(|remaining| self.emit(SessionEvent::CountdownTick { remaining }))
            .await;
        if outcome == CountdownOutcome::Cancelled {
            let mut ctx = self.lock()?;
            if ctx.generation == generation {
                ctx.capture_in_flight = false;
                ctx.countdown = None;
            }
            return Ok(CaptureOutcome::Cancelled);
        }

        let metrics = *self.shared.renderer.metrics();
        let grabbed = capturer::capture(camera.source(), metrics.cell_width, metrics.cell_height)
            .await
            .and_then(|cell| Shot::from_image(0, &cell));
        drop(camera);

        let (index, full) = {
            let mut ctx = self.lock()?;
            if ctx.generation != generation {
                tracing::debug!("discarding capture from a reset session");
                return Ok(CaptureOutcome::Discarded);
            }
            ctx.capture_in_flight = false;
            ctx.countdown = None;

            let shot = match grabbed {
                Ok(shot) => shot,
                Err(e) => {
                    tracing::warn!(error = %e, "capture failed");
                    drop(ctx);
                    if e.is_user_visible() {
                        self.notice(e.to_string());
                    }
                    return Err(e);
                }
            };

            let index = ctx.shots.len();
            ctx.shots.push(shot.reindexed(index));
            let total = ctx.layout.shot_count as usize;
            tracing::info!(index, total, "shot captured");
            self.emit(SessionEvent::ShotCaptured { index, total });
            (index, ctx.is_full())
        };

        if !full {
            return Ok(CaptureOutcome::Captured { index });
        }

        tokio::time::sleep(self.shared.settings.completion_delay).await;
        {
            let mut ctx = self.lock()?;
            if ctx.generation != generation || ctx.state != SessionState::Active || !ctx.is_full() {
                return Ok(CaptureOutcome::Captured { index });
            }
            ctx.release_camera();
            self.set_state(&mut ctx, SessionState::Completing);
        }

        match self.render_and_persist(Persist::CreateOrUpdate).await {
            Ok(Some(record_id)) => Ok(CaptureOutcome::Completed { record_id }),
            Ok(None) => Ok(CaptureOutcome::Discarded),
            Err(e) => Err(e),
        }
    }

    /// Cancel a running countdown. Returns whether anything was cancelled.
    pub fn cancel_capture(&self) -> BoothResult<bool> {
        let mut ctx = self.lock()?;
        if !ctx.capture_in_flight {
            return Ok(false);
        }
        ctx.reset_capture();
        tracing::info!("capture cancelled");
        Ok(true)
    }

    /// Drop shot `index`; later shots move down by one and the next capture
    /// fills the tail.
    ///
    /// From `Completing` this reopens the camera and returns to `Active`,
    /// keeping the saved record so the next completion updates it.
    pub async fn retake(&self, index: usize) -> BoothResult<()> {
        let state = {
            let ctx = self.lock()?;
            check_index(&ctx, index)?;
            ctx.state
        };

        let lease = match state {
            SessionState::Active => None,
            SessionState::Completing => Some(self.shared.camera.acquire().await?),
            SessionState::Idle => {
                return Err(BoothError::invalid_state("no session to retake in"));
            }
        };

        let mut ctx = self.lock()?;
        check_index(&ctx, index)?;
        if let Some(lease) = lease {
            ctx.release_camera();
            ctx.camera = Some(Arc::new(lease));
        }
        ctx.reset_capture();
        ctx.last_composite = None;
        ctx.shots.remove(index);
        let reindexed: Vec<Shot> = ctx
            .shots
            .drain(..)
            .enumerate()
            .map(|(i, shot)| shot.reindexed(i))
            .collect();
        ctx.shots = reindexed;

        tracing::info!(index, remaining = ctx.shots.len(), "shot removed for retake");
        self.emit(SessionEvent::ShotRemoved { index });
        self.set_state(&mut ctx, SessionState::Active);
        Ok(())
    }

    /// Clear every shot and go back to `Active` with the same layout and
    /// filter. The next completion creates a new record.
    pub async fn retake_all(&self) -> BoothResult<()> {
        let state = self.lock()?.state;
        let lease = match state {
            SessionState::Active => None,
            SessionState::Completing => Some(self.shared.camera.acquire().await?),
            SessionState::Idle => {
                return Err(BoothError::invalid_state("no session to retake in"));
            }
        };

        let mut ctx = self.lock()?;
        if ctx.state == SessionState::Idle {
            return Err(BoothError::invalid_state("session ended during retake"));
        }
        if let Some(lease) = lease {
            ctx.release_camera();
            ctx.camera = Some(Arc::new(lease));
        }
        ctx.reset_capture();
        ctx.shots.clear();
        ctx.saved_record_id = None;
        ctx.last_composite = None;
        tracing::info!("all shots cleared");
        self.set_state(&mut ctx, SessionState::Active);
        Ok(())
    }

    /// Change the layout. With shots taken, `confirm` decides whether they
    /// may be thrown away; with none it is never called.
    pub fn switch_layout(
        &self,
        layout: LayoutId,
        confirm: impl FnOnce(&Layout) -> bool,
    ) -> BoothResult<LayoutSwitch> {
        let has_shots = {
            let ctx = self.lock()?;
            if ctx.state == SessionState::Completing {
                return Err(BoothError::invalid_state("layout is fixed once completed"));
            }
            if ctx.layout.id == layout {
                return Ok(LayoutSwitch::Unchanged);
            }
            !ctx.shots.is_empty()
        };

        // Called unlocked: the callback may query the session.
        if has_shots && !confirm(layout.layout()) {
            return Ok(LayoutSwitch::Declined);
        }

        let mut ctx = self.lock()?;
        ctx.reset_capture();
        ctx.shots.clear();
        ctx.layout = layout.layout();
        tracing::info!(layout = %layout, "layout switched");
        self.emit(SessionEvent::LayoutChanged(layout));
        Ok(LayoutSwitch::Applied)
    }

    /// Change the filter. In `Completing` the composite is re-rendered and
    /// the saved record (if any) updated.
    pub async fn set_filter(&self, filter: FilterId) -> BoothResult<()> {
        let state = {
            let mut ctx = self.lock()?;
            if ctx.state == SessionState::Idle {
                return Err(BoothError::invalid_state("no session to filter"));
            }
            if ctx.filter.id == filter {
                return Ok(());
            }
            ctx.filter = filter.spec();
            ctx.state
        };
        tracing::info!(filter = %filter, "filter changed");
        self.emit(SessionEvent::FilterChanged(filter));

        if state == SessionState::Completing {
            self.render_and_persist(Persist::UpdateOnly).await?;
        }
        Ok(())
    }

    /// End the session and release the camera. Legal from any state.
    pub fn abandon(&self) -> BoothResult<()> {
        let mut ctx = self.lock()?;
        ctx.reset_capture();
        ctx.release_camera();
        ctx.shots.clear();
        ctx.saved_record_id = None;
        ctx.last_composite = None;
        tracing::info!("session abandoned");
        self.set_state(&mut ctx, SessionState::Idle);
        Ok(())
    }

    /// Re-render the result view and write it to the store, creating the
    /// record when no earlier save went through.
    ///
    /// Also retries a completion whose render failed.
    pub async fn save(&self) -> BoothResult<RecordId> {
        {
            let ctx = self.lock()?;
            if ctx.state != SessionState::Completing {
                return Err(BoothError::invalid_state(format!(
                    "nothing to save while {}",
                    ctx.state
                )));
            }
        }
        match self.render_and_persist(Persist::CreateOrUpdate).await? {
            Some(Some(id)) => Ok(id),
            Some(None) => Err(BoothError::persistence("session was not saved")),
            None => Err(BoothError::invalid_state("session changed while saving")),
        }
    }

    /// Re-render and encode the composite for download.
    ///
    /// When the session has a saved record its composite is updated with
    /// the export (best effort). Fails if the session is reset while
    /// rendering.
    pub async fn export(&self, options: ExportOptions) -> BoothResult<EncodedImage> {
        let _render = self.shared.render_lock.lock().await;
        let (generation, shots, layout, filter, record_id) = {
            let ctx = self.lock()?;
            if ctx.state != SessionState::Completing {
                return Err(BoothError::invalid_state(format!(
                    "nothing to export while {}",
                    ctx.state
                )));
            }
            (
                ctx.generation,
                ctx.shots.clone(),
                ctx.layout,
                ctx.filter,
                ctx.saved_record_id,
            )
        };

        let image = self.render_blocking(shots, layout, filter).await?;
        let encoded = encode(&image, options)?;
        {
            let mut ctx = self.lock()?;
            if ctx.generation != generation || ctx.state != SessionState::Completing {
                tracing::debug!("discarding export from a reset session");
                return Err(BoothError::invalid_state("session changed during export"));
            }
            ctx.last_composite = Some(image);
        }

        if let Some(id) = record_id {
            let patch = RecordPatch {
                composite: Some(encoded.clone()),
                filter_id: Some(filter.id.to_string()),
            };
            if let Err(e) = self.shared.store.update(id, patch).await {
                self.persistence_failed("update", &e);
            }
        }
        tracing::info!(format = ?encoded.format, bytes = encoded.bytes.len(), "composite exported");
        Ok(encoded)
    }

    // ── Internals ──────────────────────────────────────────────

    async fn render_blocking(
        &self,
        shots: Vec<Shot>,
        layout: &'static Layout,
        filter: &'static FilterSpec,
    ) -> BoothResult<RgbaImage> {
        let renderer = self.shared.renderer.clone();
        let date = today();
        tokio::task::spawn_blocking(move || renderer.render(&shots, layout, filter, date))
            .await
            .map_err(|e| BoothError::render(format!("render task failed: {e}")))?
    }

    /// Render the current shots and persist the result.
    ///
    /// Returns `Ok(Some(id))` with the record id (`None` inside when the
    /// store failed), or `Ok(None)` when the session moved on while
    /// rendering.
    async fn render_and_persist(&self, persist: Persist) -> BoothResult<Option<Option<RecordId>>> {
        let _render = self.shared.render_lock.lock().await;
        let (generation, shots, layout, filter) = {
            let ctx = self.lock()?;
            (ctx.generation, ctx.shots.clone(), ctx.layout, ctx.filter)
        };

        let image = match self.render_blocking(shots, layout, filter).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(error = %e, "composite render failed");
                if e.is_user_visible() {
                    self.notice(e.to_string());
                }
                return Err(e);
            }
        };
        let png = encode(&image, ExportOptions::png())?;

        let record_id = {
            let mut ctx = self.lock()?;
            if ctx.generation != generation || ctx.state != SessionState::Completing {
                tracing::debug!("discarding composite from a reset session");
                return Ok(None);
            }
            ctx.last_composite = Some(image);
            ctx.saved_record_id
        };

        let store = &self.shared.store;
        let saved = match (record_id, persist) {
            (Some(id), _) => {
                let patch = RecordPatch {
                    composite: Some(png),
                    filter_id: Some(filter.id.to_string()),
                };
                match store.update(id, patch).await {
                    Ok(()) => Some(id),
                    Err(e) => {
                        self.persistence_failed("update", &e);
                        Some(id)
                    }
                }
            }
            (None, Persist::CreateOrUpdate) => {
                match store.create(layout.id.as_str(), filter.id.as_str(), png).await {
                    Ok(id) => {
                        let mut ctx = self.lock()?;
                        if ctx.generation == generation {
                            ctx.saved_record_id = Some(id);
                        }
                        Some(id)
                    }
                    Err(e) => {
                        self.persistence_failed("create", &e);
                        None
                    }
                }
            }
            (None, Persist::UpdateOnly) => None,
        };

        self.emit(SessionEvent::CompositeReady { record_id: saved });
        Ok(Some(saved))
    }

    fn persistence_failed(&self, action: &str, err: &BoothError) {
        tracing::warn!(action, store = self.shared.store.name(), error = %err, "persistence failed");
        self.notice(format!("Could not save session: {err}"));
    }
}

fn check_index(ctx: &SessionContext, index: usize) -> BoothResult<()> {
    if index >= ctx.shots.len() {
        return Err(BoothError::IndexOutOfRange {
            index,
            len: ctx.shots.len(),
        });
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
