//! Error types for the playback engine

use thiserror::Error;

/// Playback errors
///
/// Control calls never fail on ordinary misuse (bad index, no track loaded);
/// these variants cover genuine resource and configuration problems.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio resource for a track could not be loaded
    #[error("Failed to load track {track_id}: {reason}")]
    LoadFailed { track_id: String, reason: String },

    /// The audio session rejected an operation
    #[error("Audio session error: {0}")]
    Session(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        PlaybackError::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
