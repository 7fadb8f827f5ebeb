//! Error types shared across Photobooth crates.

use std::path::PathBuf;

/// Top-level error type for Photobooth operations.
#[derive(Debug, thiserror::Error)]
pub enum BoothError {
    /// Camera denied, missing, or failed to open.
    #[error("Capture source unavailable: {message}")]
    SourceUnavailable { message: String },

    /// A frame was requested before the source reported its dimensions.
    #[error("Capture source not ready: {message}")]
    SourceNotReady { message: String },

    #[error("Shot index {index} out of range (session holds {len} shots)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to decode shot {index}: {message}")]
    ImageDecodeFailed { index: usize, message: String },

    #[error("Persistence failure: {message}")]
    PersistenceFailure { message: String },

    #[error("Unknown layout: {id}")]
    UnknownLayout { id: String },

    #[error("Unknown filter: {id}")]
    UnknownFilter { id: String },

    #[error("Invalid session state: {message}")]
    InvalidState { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using BoothError.
pub type BoothResult<T> = Result<T, BoothError>;

impl BoothError {
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: msg.into(),
        }
    }

    pub fn source_not_ready(msg: impl Into<String>) -> Self {
        Self::SourceNotReady {
            message: msg.into(),
        }
    }

    pub fn decode_failed(index: usize, msg: impl Into<String>) -> Self {
        Self::ImageDecodeFailed {
            index,
            message: msg.into(),
        }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceFailure {
            message: msg.into(),
        }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn unknown_layout(id: impl Into<String>) -> Self {
        Self::UnknownLayout { id: id.into() }
    }

    pub fn unknown_filter(id: impl Into<String>) -> Self {
        Self::UnknownFilter { id: id.into() }
    }

    /// Whether the error should be shown to the user, as opposed to being
    /// retried or logged silently.
    pub fn is_user_visible(&self) -> bool {
        !matches!(
            self,
            Self::SourceNotReady { .. } | Self::IndexOutOfRange { .. }
        )
    }
}
