//! Camera acquisition and exclusive leases.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use photobooth_common::error::BoothResult;

use crate::source::FrameSource;

/// Exclusive ownership of a frame source.
///
/// Releasing is idempotent; dropping the lease releases it, so the device is
/// stopped on every exit path.
pub struct CameraLease {
    source: Box<dyn FrameSource>,
    released: AtomicBool,
}

impl CameraLease {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        tracing::debug!(source = source.name(), "camera acquired");
        Self {
            source,
            released: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &dyn FrameSource {
        self.source.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Stop the source now.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.source.stop();
            tracing::debug!(source = self.source.name(), "camera released");
        }
    }
}

impl Drop for CameraLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CameraLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraLease")
            .field("source", &self.source.name())
            .field("released", &self.is_released())
            .finish()
    }
}

/// Opens the camera. Failure is [`SourceUnavailable`].
///
/// [`SourceUnavailable`]: photobooth_common::error::BoothError::SourceUnavailable
#[async_trait]
pub trait CameraProvider: Send + Sync {
    async fn acquire(&self) -> BoothResult<CameraLease>;

    fn name(&self) -> &str;
}

/// Builds a fresh source from a closure on every acquisition.
pub struct FnCameraProvider<F> {
    name: String,
    make: F,
}

impl<F> FnCameraProvider<F>
where
    F: Fn() -> BoothResult<Box<dyn FrameSource>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, make: F) -> Self {
        Self {
            name: name.into(),
            make,
        }
    }
}

#[async_trait]
impl<F> CameraProvider for FnCameraProvider<F>
where
    F: Fn() -> BoothResult<Box<dyn FrameSource>> + Send + Sync,
{
    async fn acquire(&self) -> BoothResult<CameraLease> {
        (self.make)().map(CameraLease::new)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
