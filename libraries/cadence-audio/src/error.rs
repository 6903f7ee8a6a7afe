/// Audio engine errors
use thiserror::Error;

/// Result type for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    /// Media could not be loaded
    #[error("Failed to load media: {0}")]
    LoadFailed(String),

    /// Operation needs loaded media
    #[error("No media loaded")]
    NotLoaded,

    /// Engine rejected an operation
    #[error("Engine error: {0}")]
    Engine(String),

    /// Audio session could not be configured
    #[error("Audio session error: {0}")]
    Session(String),
}

impl From<AudioError> for cadence_core::CadenceError {
    fn from(err: AudioError) -> Self {
        cadence_core::CadenceError::audio(err.to_string())
    }
}
