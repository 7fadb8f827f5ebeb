pub mod check;
pub mod compose;
pub mod config;
pub mod gallery;
pub mod registry;
pub mod shoot;

use std::path::{Path, PathBuf};

use photobooth_common::config::AppConfig;
use photobooth_model::EncodedFormat;
use photobooth_render_engine::{ExportOptions, DEFAULT_JPEG_QUALITY};

/// Export options from CLI flags, falling back to the configured quality.
pub fn export_options(config: &AppConfig, format: EncodedFormat, quality: Option<f32>) -> ExportOptions {
    let quality = quality.unwrap_or(if config.export.jpeg_quality > 0.0 {
        config.export.jpeg_quality
    } else {
        DEFAULT_JPEG_QUALITY
    });
    ExportOptions { format, quality }
}

/// `output` as given, or `fallback` in the current directory.
pub fn output_path(output: Option<PathBuf>, fallback: &str) -> PathBuf {
    output.unwrap_or_else(|| Path::new(".").join(fallback))
}
