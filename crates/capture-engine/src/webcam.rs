//! V4L2 webcam source backed by `ffmpeg`.
//!
//! Each frame is a single `ffmpeg` invocation that reads one frame from the
//! device and writes it as PNG to stdout. This keeps the booth free of
//! native video bindings; a photobooth needs a handful of stills, not a
//! stream.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use async_trait::async_trait;
use image::RgbaImage;
use photobooth_common::error::{BoothError, BoothResult};
use tokio::process::Command;

use crate::camera::{CameraLease, CameraProvider};
use crate::source::FrameSource;

/// Grabs frames from a V4L2 device through `ffmpeg`.
#[derive(Debug)]
pub struct FfmpegWebcamSource {
    device: String,
    size: OnceLock<(u32, u32)>,
    stopped: AtomicBool,
}

impl FfmpegWebcamSource {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            size: OnceLock::new(),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

#[async_trait]
impl FrameSource for FfmpegWebcamSource {
    fn name(&self) -> &str {
        &self.device
    }

    /// Known after the first successful frame.
    fn natural_size(&self) -> Option<(u32, u32)> {
        self.size.get().copied()
    }

    async fn current_frame(&self) -> BoothResult<RgbaImage> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(BoothError::source_unavailable(format!("{} is stopped", self.device)));
        }

        tracing::trace!(device = %self.device, "grabbing webcam frame");
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-f", "video4linux2", "-i"])
            .arg(&self.device)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| BoothError::source_unavailable(format!("failed to start ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BoothError::source_unavailable(format!(
                "ffmpeg could not read {} (status {}): {}",
                self.device,
                output.status,
                stderr.trim()
            )));
        }

        let frame = image::load_from_memory(&output.stdout)
            .map_err(|e| BoothError::source_not_ready(format!("unreadable frame: {e}")))?
            .to_rgba8();
        let _ = self.size.set(frame.dimensions());
        Ok(frame)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Acquires a webcam, picking the best `/dev/video*` node when no device is
/// configured.
#[derive(Debug, Clone, Default)]
pub struct WebcamProvider {
    device: Option<String>,
}

impl WebcamProvider {
    pub fn new(device: Option<String>) -> Self {
        Self { device }
    }
}

#[async_trait]
impl CameraProvider for WebcamProvider {
    async fn acquire(&self) -> BoothResult<CameraLease> {
        if !command_exists("ffmpeg").await {
            return Err(BoothError::source_unavailable(
                "ffmpeg not found in PATH (required for webcam capture)",
            ));
        }
        let device = match &self.device {
            Some(device) => device.clone(),
            None => detect_webcam_device().ok_or_else(|| {
                BoothError::source_unavailable(
                    "No webcam device found (expected /dev/video0 or another /dev/video* node)",
                )
            })?,
        };

        let source = FfmpegWebcamSource::new(device);
        // Warm-up frame: proves the device opens and learns its size.
        source.current_frame().await.map_err(|e| match e {
            BoothError::SourceUnavailable { .. } => e,
            other => BoothError::source_unavailable(other.to_string()),
        })?;
        tracing::info!(device = %source.device(), size = ?source.natural_size(), "webcam ready");
        Ok(CameraLease::new(Box::new(source)))
    }

    fn name(&self) -> &str {
        self.device.as_deref().unwrap_or("webcam")
    }
}

async fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Pick the most webcam-like `/dev/videoN` node.
///
/// Candidates are scored by their sysfs name: capture cards and tuners are
/// skipped, names that look like cameras win, and anything else is a low
/// priority fallback.
pub fn detect_webcam_device() -> Option<String> {
    let mut candidates: Vec<(String, u32)> = (0..16u32)
        .filter_map(|idx| {
            let path = format!("/dev/video{idx}");
            Path::new(&path).exists().then(|| {
                let name = std::fs::read_to_string(format!("/sys/class/video4linux/video{idx}/name"))
                    .unwrap_or_default();
                let priority = webcam_name_priority(&name);
                (path, priority)
            })
        })
        .filter(|(_, priority)| *priority > 0)
        .collect();

    // Stable sort keeps the lowest index first among equals.
    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    let (device, priority) = candidates.into_iter().next()?;
    tracing::info!(%device, priority, "selected webcam device");
    Some(device)
}

/// Score a V4L2 device name; 0 means "not a webcam".
fn webcam_name_priority(name: &str) -> u32 {
    const WEBCAM: &[&str] = &["webcam", "camera", "cam", "facetime", "uvc", "v4l2loopback"];
    const NOT_WEBCAM: &[&str] = &[
        "tuner", "dvb", "hdmi", "capture", "encoder", "decoder", "metadata",
    ];

    let name = name.trim().to_lowercase();
    if NOT_WEBCAM.iter().any(|kw| name.contains(kw)) {
        return 0;
    }
    if WEBCAM.iter().any(|kw| name.contains(kw)) {
        80
    } else {
        10
    }
}

/// One line of the `check` report.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Probe what live capture needs.
pub async fn check_capabilities() -> Vec<Capability> {
    let ffmpeg = command_exists("ffmpeg").await;
    let webcam = detect_webcam_device();
    vec![
        Capability {
            name: "ffmpeg".to_string(),
            description: "Frame grabbing from V4L2 devices".to_string(),
            available: ffmpeg,
            required: true,
            fix_instructions: (!ffmpeg).then(|| "Install ffmpeg and make sure it is in PATH".to_string()),
        },
        Capability {
            name: "Webcam Device".to_string(),
            description: match &webcam {
                Some(device) => format!("Video4Linux camera at {device}"),
                None => "Video4Linux camera".to_string(),
            },
            available: webcam.is_some(),
            required: true,
            fix_instructions: webcam.is_none().then(|| {
                "Connect a webcam and verify /dev/video* exists (v4l2-ctl --list-devices)".to_string()
            }),
        },
    ]
}
