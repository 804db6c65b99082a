//! Preparation of clip ranges for final video assembly.

use storyreel_models::{ClipTimeRange, ProductionScript};
use storyreel_timing::{ClipTimingValidator, ClipValidation, Timed};

use crate::logging::JobLogger;
use crate::metrics;

/// One clip per scene, numbered like the scenes.
///
/// A scene without timing maps to an empty range at 0, which the validator
/// then repairs like any other degenerate clip.
pub fn clip_ranges_from_script(script: &ProductionScript) -> Vec<ClipTimeRange> {
    script
        .scenes
        .iter()
        .map(|scene| {
            let (start, end) = Timed::span(scene);
            ClipTimeRange::new(scene.scene_number, start, end)
        })
        .collect()
}

/// Repair `clips` and report every repair on the job log.
pub fn validate_for_assembly(
    validator: &ClipTimingValidator,
    clips: &[ClipTimeRange],
    logger: &JobLogger,
) -> ClipValidation {
    let validation = validator.validate(clips);
    for message in validation.warning_messages() {
        logger.log_warning(&message);
    }
    metrics::record_clip_repairs(&validation);

    if validation.is_clean() {
        logger.log_progress(&format!("{} clips ready for assembly", clips.len()));
    } else {
        logger.log_progress(&format!(
            "{} clips ready for assembly after {} repairs",
            clips.len(),
            validation.warnings.len()
        ));
    }
    validation
}
