//! Structured job logging.
//!
//! Every line a job emits carries its job id and the stage name, so a
//! single narration track can be followed through JSON logs.

use storyreel_models::JobId;
use tracing::{error, info, warn, Span};

/// Logs job lifecycle events with consistent context fields.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    stage: &'static str,
}

impl JobLogger {
    pub fn new(job_id: &JobId, stage: &'static str) -> Self {
        Self::from_string(job_id.as_str(), stage)
    }

    pub fn from_string(job_id: &str, stage: &'static str) -> Self {
        Self {
            job_id: job_id.to_string(),
            stage,
        }
    }

    pub fn log_start(&self, detail: &str) {
        info!(job_id = %self.job_id, stage = self.stage, event = "start", "{}", detail);
    }

    pub fn log_progress(&self, detail: &str) {
        info!(job_id = %self.job_id, stage = self.stage, event = "progress", "{}", detail);
    }

    /// Non-fatal problem the job recovered from.
    pub fn log_warning(&self, detail: &str) {
        warn!(job_id = %self.job_id, stage = self.stage, event = "warning", "{}", detail);
    }

    pub fn log_error(&self, detail: &str) {
        error!(job_id = %self.job_id, stage = self.stage, event = "error", "{}", detail);
    }

    pub fn log_completion(&self, detail: &str) {
        info!(job_id = %self.job_id, stage = self.stage, event = "complete", "{}", detail);
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    /// Span to enter while the job runs. Engine logs emitted inside it
    /// (per-scene placement, clip repairs) inherit the job context.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("job", job_id = %self.job_id, stage = self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_from_job_id() {
        let job_id = JobId::from_string("story-7");
        let logger = JobLogger::new(&job_id, "alignment");

        assert_eq!(logger.job_id(), "story-7");
        assert_eq!(logger.stage(), "alignment");
    }

    #[test]
    fn test_logging_without_subscriber() {
        let logger = JobLogger::from_string("story-8", "assembly");
        let _guard = logger.create_span().entered();
        logger.log_start("3 clips");
        logger.log_warning("clip 2 shifted");
        logger.log_completion("done");
    }
}
