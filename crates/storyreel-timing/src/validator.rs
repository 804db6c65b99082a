//! Clip range repair before final assembly.
//!
//! Assembly trims and concatenates rendered clips against their narration
//! range. Ranges arriving out of order, overlapping, or with no duration
//! would produce broken cuts, so they are repaired here. Nothing in this
//! pass is fatal: every problem is fixed and reported as a warning.

use std::fmt;

use storyreel_models::{format_track_time, ClipTimeRange};
use tracing::warn;

use crate::config::TimingConfig;
use crate::timed::{shift_preserving_duration, Timed};

/// A repair applied to one clip.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipTimingWarning {
    /// Clip started before the previous clip ended and was moved later.
    Overlap {
        clip_number: u32,
        original_start: f64,
        previous_end: f64,
    },
    /// Clip had zero or negative length and was given the minimum.
    InvalidDuration {
        clip_number: u32,
        start: f64,
        end: f64,
        forced_end: f64,
    },
}

impl ClipTimingWarning {
    pub fn clip_number(&self) -> u32 {
        match self {
            ClipTimingWarning::Overlap { clip_number, .. }
            | ClipTimingWarning::InvalidDuration { clip_number, .. } => *clip_number,
        }
    }

    /// Short label, for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClipTimingWarning::Overlap { .. } => "overlap",
            ClipTimingWarning::InvalidDuration { .. } => "invalid_duration",
        }
    }
}

impl fmt::Display for ClipTimingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipTimingWarning::Overlap {
                clip_number,
                original_start,
                previous_end,
            } => write!(
                f,
                "Clip {}: overlap with previous clip (starts {} before {} end); shifted to {}",
                clip_number,
                format_track_time(*original_start),
                format_track_time(*previous_end),
                format_track_time(*previous_end),
            ),
            ClipTimingWarning::InvalidDuration {
                clip_number,
                start,
                end,
                forced_end,
            } => write!(
                f,
                "Clip {}: invalid duration ({} to {}); extended to {}",
                clip_number,
                format_track_time(*start),
                format_track_time(*end),
                format_track_time(*forced_end),
            ),
        }
    }
}

/// Repaired clips and what was done to them.
#[derive(Debug, Clone, Default)]
pub struct ClipValidation {
    pub fixed_clips: Vec<ClipTimeRange>,
    pub warnings: Vec<ClipTimingWarning>,
}

impl ClipValidation {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Repairs the flat clip range list handed to video assembly.
///
/// Works on clip ranges only and never looks at narration text, so it can
/// run on clips from any source, not just aligned scripts.
pub struct ClipTimingValidator {
    config: TimingConfig,
}

impl ClipTimingValidator {
    /// Create a new validator. Uses the overlap tolerance and minimum clip
    /// duration from `config`.
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Sort clips by start (ties by clip number) and repair overlaps and
    /// degenerate durations.
    ///
    /// Overlapping clips are moved to the previous end with their duration
    /// kept, the same policy the timeline smoother uses.
    pub fn validate(&self, clips: &[ClipTimeRange]) -> ClipValidation {
        let mut sorted = clips.to_vec();
        sorted.sort_by(|a, b| {
            a.audio_start_sec
                .total_cmp(&b.audio_start_sec)
                .then(a.clip_number.cmp(&b.clip_number))
        });

        let (validation, _) = sorted.into_iter().fold(
            (ClipValidation::default(), 0.0),
            |(mut validation, previous_end), mut clip| {
                let original_start = clip.audio_start_sec;
                if original_start < previous_end - self.config.overlap_tolerance_secs {
                    shift_preserving_duration(&mut clip, previous_end);
                    validation.warnings.push(ClipTimingWarning::Overlap {
                        clip_number: clip.clip_number,
                        original_start,
                        previous_end,
                    });
                }

                let (start, end) = clip.span();
                if end <= start {
                    let forced_end = start + self.config.min_clip_secs;
                    clip.set_span(start, forced_end);
                    validation.warnings.push(ClipTimingWarning::InvalidDuration {
                        clip_number: clip.clip_number,
                        start,
                        end,
                        forced_end,
                    });
                }

                let next_end = clip.audio_end_sec;
                validation.fixed_clips.push(clip);
                (validation, next_end)
            },
        );

        for warning in &validation.warnings {
            warn!(clip_number = warning.clip_number(), "{}", warning);
        }
        validation
    }
}
