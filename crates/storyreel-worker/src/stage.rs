//! The alignment stage: one job in, one timed script out.
//!
//! ```text
//! raw transcript ─► normalize ─► preconditions ─► align ─► quality ─► clip repair
//! ```
//!
//! Input problems (unparsable transcript, empty narration) fail the job.
//! Everything after that point always succeeds; weak timing is surfaced as
//! a soft quality warning instead.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use storyreel_models::{AlignmentResult, JobId, NarrationTimestamps};
use storyreel_timing::{check_preconditions, ClipTimingValidator, SceneAligner};

use crate::assembly::{clip_ranges_from_script, validate_for_assembly};
use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::job::{AlignmentJob, AlignmentJobOutput};
use crate::logging::JobLogger;
use crate::metrics;

/// Shown to users when too much of a project was placed without a match.
pub const APPROXIMATE_TIMING_WARNING: &str = "scene timing may be approximate";

/// Summary of how well a script matched its narration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentQuality {
    pub mean_confidence: f64,
    pub trusted_scenes: usize,
    pub untrusted_scenes: usize,
    pub split_scenes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl AlignmentQuality {
    /// Flag the run when the share of untrusted scenes reaches
    /// `low_confidence_ratio`.
    pub fn assess(
        results: &[AlignmentResult],
        trust_threshold: f64,
        low_confidence_ratio: f64,
    ) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let total = results.len();
        let trusted_scenes = results
            .iter()
            .filter(|r| r.is_trusted(trust_threshold))
            .count();
        let untrusted_scenes = total - trusted_scenes;
        let mean_confidence = results.iter().map(|r| r.confidence).sum::<f64>() / total as f64;

        let untrusted_ratio = untrusted_scenes as f64 / total as f64;
        let warning = (untrusted_ratio >= low_confidence_ratio)
            .then(|| APPROXIMATE_TIMING_WARNING.to_string());

        Self {
            mean_confidence,
            trusted_scenes,
            untrusted_scenes,
            split_scenes: results.iter().filter(|r| r.was_split).count(),
            warning,
        }
    }

    pub fn is_approximate(&self) -> bool {
        self.warning.is_some()
    }
}

pub struct AlignmentStage {
    config: WorkerConfig,
    aligner: SceneAligner,
    validator: ClipTimingValidator,
}

impl AlignmentStage {
    pub fn new(config: WorkerConfig) -> WorkerResult<Self> {
        config.validate()?;
        Ok(Self {
            aligner: SceneAligner::new(config.timing.clone()),
            validator: ClipTimingValidator::new(config.timing.clone()),
            config,
        })
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run one job. Fails only on unusable input.
    pub fn run(&self, job: AlignmentJob) -> WorkerResult<AlignmentJobOutput> {
        let job_id = job.job_id.clone().unwrap_or_default();
        let logger = JobLogger::new(&job_id, "alignment");
        let _span = logger.create_span().entered();

        match self.execute(job_id, job, &logger) {
            Ok(output) => {
                metrics::record_job_completed();
                Ok(output)
            }
            Err(e) => {
                logger.log_error(&e.to_string());
                let reason = if e.is_bad_input() { "bad_input" } else { "internal" };
                metrics::record_job_failed(reason);
                Err(e)
            }
        }
    }

    /// Load a job file, run it and write the output.
    ///
    /// Returns the path written. Without an explicit `output` the result
    /// goes to `<output_dir>/<job_id>.alignment.json`.
    pub async fn run_file(&self, input: &Path, output: Option<&Path>) -> WorkerResult<PathBuf> {
        let job = AlignmentJob::load(input).await?;
        let result = self.run(job)?;
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => result.default_path(&self.config.output_dir),
        };
        result.write(&path).await?;
        Ok(path)
    }

    fn execute(
        &self,
        job_id: JobId,
        job: AlignmentJob,
        logger: &JobLogger,
    ) -> WorkerResult<AlignmentJobOutput> {
        logger.log_start(&format!(
            "{} scenes, {} transcript",
            job.script.len(),
            job.transcript.shape()
        ));

        let timestamps = job.transcript.into_timestamps()?;
        check_preconditions(&timestamps)?;
        log_transcript(logger, &timestamps);

        let aligned = self.aligner.align(&job.script, &timestamps);
        metrics::record_alignment(&aligned.alignment_results);

        let quality = AlignmentQuality::assess(
            &aligned.alignment_results,
            self.config.timing.match_threshold,
            self.config.low_confidence_ratio,
        );
        if let Some(warning) = &quality.warning {
            logger.log_warning(&format!(
                "{} ({} of {} scenes untrusted)",
                warning,
                quality.untrusted_scenes,
                aligned.alignment_results.len()
            ));
        }

        let clips = clip_ranges_from_script(&aligned.aligned_script);
        let validation = validate_for_assembly(&self.validator, &clips, logger);

        logger.log_completion(&format!(
            "{} scenes aligned, mean confidence {:.2}",
            aligned.alignment_results.len(),
            quality.mean_confidence
        ));

        Ok(AlignmentJobOutput {
            job_id,
            aligned_script: aligned.aligned_script,
            alignment_results: aligned.alignment_results,
            quality,
            clip_warnings: validation.warning_messages(),
            clips: validation.fixed_clips,
            completed_at: Utc::now(),
        })
    }
}

fn log_transcript(logger: &JobLogger, timestamps: &NarrationTimestamps) {
    logger.log_progress(&format!(
        "transcript has {} words in {} segments over {:.1}s",
        timestamps.words.len(),
        timestamps.segments.len(),
        timestamps.total_duration_sec
    ));
}
