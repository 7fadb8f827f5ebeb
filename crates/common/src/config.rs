//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where completed sessions are stored.
    pub store_dir: PathBuf,

    /// Capture pacing and defaults.
    pub capture: CaptureDefaults,

    /// Composite canvas styling.
    pub composite: CompositeConfig,

    /// Export defaults.
    pub export: ExportDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default capture parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureDefaults {
    /// Countdown steps before each shot.
    pub countdown_steps: u32,

    /// Milliseconds between countdown ticks.
    pub tick_ms: u64,

    /// Milliseconds the last thumbnail stays visible before the session completes.
    pub completion_delay_ms: u64,

    /// Layout selected when nothing else was chosen.
    pub default_layout: String,

    /// Filter every new session starts with.
    pub default_filter: String,

    /// Video device path (e.g. `/dev/video0`). Auto-detected when unset.
    pub device: Option<String>,
}

/// Composite canvas metrics and styling, in output pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub cell_width: u32,
    pub cell_height: u32,
    pub padding: u32,
    pub gap: u32,
    pub label_height: u32,

    /// Name shown in the watermark.
    pub product_name: String,

    /// Background color as hex string (for example `#ffffff`).
    pub background: String,

    /// Border color as hex string.
    pub border: String,

    /// Watermark text color as hex string.
    pub watermark_color: String,
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// JPEG quality in `[0.0, 1.0]`.
    pub jpeg_quality: f32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "photobooth=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: dirs_default_store(),
            capture: CaptureDefaults::default(),
            composite: CompositeConfig::default(),
            export: ExportDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            countdown_steps: 3,
            tick_ms: 1000,
            completion_delay_ms: 400,
            default_layout: "strip3".to_string(),
            default_filter: "normal".to_string(),
            device: None,
        }
    }
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            cell_width: 480,
            cell_height: 360,
            padding: 20,
            gap: 10,
            label_height: 48,
            product_name: "LJR Photobooth".to_string(),
            background: "#ffffff".to_string(),
            border: "#e0e0e0".to_string(),
            watermark_color: "#aaaaaa".to_string(),
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self { jpeg_quality: 0.92 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("photobooth").join("config.json")
}

/// Default session store directory.
fn dirs_default_store() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("photobooth").join("sessions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_booth_pacing() {
        let config = AppConfig::default();
        assert_eq!(config.capture.countdown_steps, 3);
        assert_eq!(config.capture.tick_ms, 1000);
        assert_eq!(config.capture.completion_delay_ms, 400);
        assert_eq!(config.composite.cell_width, 480);
        assert_eq!(config.composite.cell_height, 360);
        assert!((config.export.jpeg_quality - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{ "capture": { "countdown_steps": 5 } }"#).unwrap();
        assert_eq!(parsed.capture.countdown_steps, 5);
        assert_eq!(parsed.capture.default_layout, "strip3");
        assert_eq!(parsed.composite.product_name, "LJR Photobooth");
        assert_eq!(parsed.logging.level, "info");
    }
}
