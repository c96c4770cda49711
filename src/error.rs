//! Error handling for the greeting card
//!
//! Missing page elements are never errors; they degrade to skipped steps.
//! What remains is configuration trouble and playback refusals, and the
//! latter are absorbed by the audio controller.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for greeting card operations
pub type Result<T> = std::result::Result<T, CardError>;

/// Main error type for greeting card operations
#[derive(Error, Debug)]
pub enum CardError {
    // Configuration Errors
    #[error("Failed to read config file: {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Playback Errors
    #[error("Playback blocked by autoplay policy")]
    PlaybackBlocked,

    #[error("Playback unavailable: {reason}")]
    PlaybackUnavailable { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CardError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CardError::ConfigRead { .. } => "CONFIG_READ",
            CardError::InvalidConfig { .. } => "INVALID_CONFIG",
            CardError::PlaybackBlocked => "PLAYBACK_BLOCKED",
            CardError::PlaybackUnavailable { .. } => "PLAYBACK_UNAVAILABLE",
            CardError::Io(_) => "IO_ERROR",
            CardError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Playback refusals fall back to a manual play affordance, so the card
    /// keeps working. Configuration errors stop the card from loading.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CardError::PlaybackBlocked | CardError::PlaybackUnavailable { .. }
        )
    }
}
