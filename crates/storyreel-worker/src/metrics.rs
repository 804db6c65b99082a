//! Alignment metrics.
//!
//! Recorded through the `metrics` facade. Without an installed recorder
//! every call is a no-op, so the binary runs the same with or without an
//! exporter.

use metrics::{counter, histogram};
use storyreel_models::AlignmentResult;
use storyreel_timing::ClipValidation;

/// Metric names as constants for consistency.
pub mod names {
    pub const SCENES_ALIGNED_TOTAL: &str = "storyreel_scenes_aligned_total";
    pub const SCENES_SPLIT_TOTAL: &str = "storyreel_scenes_split_total";
    pub const ALIGNMENT_CONFIDENCE: &str = "storyreel_alignment_confidence";
    pub const CLIP_REPAIRS_TOTAL: &str = "storyreel_clip_repairs_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "storyreel_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "storyreel_jobs_failed_total";
}

/// Record one alignment run, one sample per output scene.
pub fn record_alignment(results: &[AlignmentResult]) {
    for result in results {
        let labels = [("method", result.method.as_str().to_string())];
        counter!(names::SCENES_ALIGNED_TOTAL, &labels).increment(1);
        histogram!(names::ALIGNMENT_CONFIDENCE, &labels).record(result.confidence);
    }

    let split = results.iter().filter(|r| r.was_split).count();
    if split > 0 {
        counter!(names::SCENES_SPLIT_TOTAL).increment(split as u64);
    }
}

/// Record clip repairs made before assembly.
pub fn record_clip_repairs(validation: &ClipValidation) {
    for warning in &validation.warnings {
        let labels = [("kind", warning.kind().to_string())];
        counter!(names::CLIP_REPAIRS_TOTAL, &labels).increment(1);
    }
}

pub fn record_job_completed() {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
}

pub fn record_job_failed(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::JOBS_FAILED_TOTAL, &labels).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_models::{AlignmentMethod, ClipTimeRange};
    use storyreel_timing::{ClipTimingValidator, TimingConfig};

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let results = vec![AlignmentResult {
            scene_number: 1,
            start_sec: 0.0,
            end_sec: 4.0,
            confidence: 0.8,
            method: AlignmentMethod::FuzzyMatch,
            was_split: false,
            original_scene_number: None,
            part_index: None,
        }];
        record_alignment(&results);

        let validation = ClipTimingValidator::new(TimingConfig::default()).validate(&[
            ClipTimeRange::new(1, 0.0, 5.0),
            ClipTimeRange::new(2, 2.0, 6.0),
        ]);
        record_clip_repairs(&validation);
        record_job_completed();
        record_job_failed("bad_input");
    }

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in [
            names::SCENES_ALIGNED_TOTAL,
            names::SCENES_SPLIT_TOTAL,
            names::ALIGNMENT_CONFIDENCE,
            names::CLIP_REPAIRS_TOTAL,
        ] {
            assert!(name.starts_with("storyreel_"));
        }
    }
}
