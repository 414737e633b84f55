//! Error types for playback management

use octave_core::OctaveError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Skip requested with nothing up next
    #[error("No next track in queue")]
    NoNextTrack,

    /// Previous requested with an empty history
    #[error("No previous track in history")]
    NoPreviousTrack,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// The media handle rejected the source or failed to play
    #[error("Media error: {0}")]
    Media(String),

    /// Persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Error bubbled up from a collaborator
    #[error(transparent)]
    Core(#[from] OctaveError),
}

impl From<octave_storage::StorageError> for PlaybackError {
    fn from(err: octave_storage::StorageError) -> Self {
        PlaybackError::Storage(err.to_string())
    }
}

impl From<octave_client::ClientError> for PlaybackError {
    fn from(err: octave_client::ClientError) -> Self {
        PlaybackError::Core(err.into())
    }
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        PlaybackError::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
