//! Worker error types.

use storyreel_models::TranscriptError;
use storyreel_timing::TimingError;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if error is retryable.
    ///
    /// Only I/O can succeed on a second attempt. A transcript or script that
    /// failed once fails the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkerError::Io(_))
    }

    /// Check if the job input itself is unusable.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            WorkerError::Transcript(_)
                | WorkerError::Json(_)
                | WorkerError::Timing(TimingError::EmptyTranscript)
                | WorkerError::Timing(TimingError::ZeroDuration(_))
        )
    }
}
