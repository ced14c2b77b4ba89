// Error types for the playback core
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No bundled clip matches the key. A routing decision, not a failure.
    #[error("No recorded clip for '{0}'")]
    ResourceNotFound(String),

    /// Clip exists but cannot be opened or decoded
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Speech engine could not be started
    #[error("Speech synthesis unavailable: {0}")]
    SynthesisUnavailable(String),

    /// Output device could not be activated
    #[error("Audio device error: {0}")]
    DeviceSession(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
