//! Frame sources.
//!
//! A [`FrameSource`] is anything that can hand out the current video frame:
//! a webcam, a still image standing in for one, or a generated test pattern.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use photobooth_common::error::{BoothError, BoothResult};

/// A live (or simulated) video source.
#[async_trait]
pub trait FrameSource: Send + Sync {
    fn name(&self) -> &str;

    /// Natural frame size, or `None` before the source knows it.
    fn natural_size(&self) -> Option<(u32, u32)>;

    /// Whether frames can be read right now.
    fn is_ready(&self) -> bool {
        matches!(self.natural_size(), Some((w, h)) if w > 0 && h > 0)
    }

    /// Read the current frame at natural size.
    async fn current_frame(&self) -> BoothResult<RgbaImage>;

    /// Stop the underlying device. Further reads fail.
    fn stop(&self);
}

/// Serves one image as every frame.
#[derive(Debug)]
pub struct StillImageSource {
    name: String,
    image: RgbaImage,
    ready: AtomicBool,
    stopped: Arc<AtomicBool>,
}

impl StillImageSource {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
            ready: AtomicBool::new(true),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load an image file.
    pub fn open(path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BoothError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let image = image::open(path)
            .map_err(|e| BoothError::source_unavailable(format!("{}: {e}", path.display())))?
            .to_rgba8();
        Ok(Self::new(path.display().to_string(), image))
    }

    /// Simulate a source whose metadata has not arrived yet.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Shared flag that flips when the source is stopped.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stopped.clone()
    }
}

#[async_trait]
impl FrameSource for StillImageSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn natural_size(&self) -> Option<(u32, u32)> {
        self.ready
            .load(Ordering::SeqCst)
            .then(|| self.image.dimensions())
    }

    async fn current_frame(&self) -> BoothResult<RgbaImage> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(BoothError::source_unavailable(format!("{} is stopped", self.name)));
        }
        if !self.is_ready() {
            return Err(BoothError::source_not_ready(format!("{} has no frame yet", self.name)));
        }
        Ok(self.image.clone())
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Generated test pattern: diagonal color ramps with a moving bar, so
/// consecutive frames differ.
#[derive(Debug)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame: AtomicU32,
    stopped: Arc<AtomicBool>,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame: AtomicU32::new(0),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stopped.clone()
    }

    fn pattern(&self, frame: u32) -> RgbaImage {
        let (w, h) = (self.width.max(1), self.height.max(1));
        let bar = (frame.wrapping_mul(w / 8 + 1)) % w;
        RgbaImage::from_fn(w, h, |x, y| {
            if x >= bar && x < bar + (w / 16).max(1) {
                return Rgba([255, 255, 255, 255]);
            }
            Rgba([
                (x * 255 / w) as u8,
                (y * 255 / h) as u8,
                ((x + y) * 255 / (w + h)) as u8,
                255,
            ])
        })
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[async_trait]
impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn natural_size(&self) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }

    async fn current_frame(&self) -> BoothResult<RgbaImage> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(BoothError::source_unavailable("synthetic source is stopped"));
        }
        if !self.is_ready() {
            return Err(BoothError::source_not_ready("synthetic source has zero size"));
        }
        let frame = self.frame.fetch_add(1, Ordering::SeqCst);
        Ok(self.pattern(frame))
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_still_source_serves_its_image() {
        let img = RgbaImage::from_pixel(8, 6, Rgba([1, 2, 3, 255]));
        let source = StillImageSource::new("still", img.clone());
        assert_eq!(source.natural_size(), Some((8, 6)));
        assert_eq!(source.current_frame().await.unwrap(), img);
    }

    #[tokio::test]
    async fn test_not_ready_source_reports_not_ready() {
        let source = StillImageSource::new("still", RgbaImage::new(8, 6));
        source.set_ready(false);
        assert!(!source.is_ready());
        assert!(matches!(
            source.current_frame().await,
            Err(BoothError::SourceNotReady { .. })
        ));
    }

    #[tokio::test]
    async fn test_stopped_source_is_unavailable() {
        let source = SyntheticSource::new(64, 48);
        let flag = source.stop_flag();
        source.stop();
        assert!(flag.load(Ordering::SeqCst));
        assert!(matches!(
            source.current_frame().await,
            Err(BoothError::SourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_synthetic_frames_change() {
        let source = SyntheticSource::new(64, 48);
        let a = source.current_frame().await.unwrap();
        let b = source.current_frame().await.unwrap();
        assert_eq!(a.dimensions(), (64, 48));
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_still_file() {
        let err = StillImageSource::open("/nonexistent/photobooth/still.png").unwrap_err();
        assert!(matches!(err, BoothError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_zero_sized_synthetic_is_not_ready() {
        let source = SyntheticSource::new(0, 48);
        assert!(!source.is_ready());
    }
}
