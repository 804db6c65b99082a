//! Error types for timing alignment.
//!
//! Data quality problems (weak matches, over-long scenes, messy clip lists)
//! are never errors; the engine resolves them itself. Only configuration
//! mistakes and caller precondition checks surface here.

use thiserror::Error;

/// Result type for timing operations.
pub type TimingResult<T> = Result<T, TimingError>;

#[derive(Debug, Error)]
pub enum TimingError {
    #[error("Invalid timing configuration: {0}")]
    InvalidConfig(String),

    #[error("Transcript contains no words")]
    EmptyTranscript,

    #[error("Transcript duration must be positive, got {0}")]
    ZeroDuration(f64),
}

impl TimingError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
