//! Timeline smoothing.
//!
//! After placement and splitting, consecutive scenes can leave gaps or
//! overlap slightly. The smoother walks the list once and makes it
//! contiguous: each scene starts exactly where the previous one ends.
//!
//! Repositioning keeps a scene's duration; only where it sits changes.
//! Durations are then re-clamped to the clip bounds and to the track end.

use tracing::warn;

use crate::config::TimingConfig;
use crate::timed::{shift_preserving_duration, Timed};

/// Float slack for duration comparisons.
const EPSILON: f64 = 1e-9;

/// Makes an ordered list of timed scenes gap-free and within clip bounds.
pub struct TimelineSmoother {
    config: TimingConfig,
}

impl TimelineSmoother {
    /// Create a new smoother with the given configuration.
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Close gaps and overlaps in document order and enforce duration bounds.
    ///
    /// - A gap larger than the tolerance, or any overlap, moves the scene
    ///   to start at the previous end (duration kept).
    /// - A gap within the tolerance is absorbed by extending the previous
    ///   scene, as long as that keeps it within the maximum.
    /// - The last scene is stretched to the track end when it stops more
    ///   than the tail threshold short and the stretch fits the maximum.
    /// - Short scenes are extended to the minimum, capped at the track end.
    /// - No scene ends after `total_duration_sec`.
    pub fn smooth<T: Timed>(&self, mut scenes: Vec<T>, total_duration_sec: f64) -> Vec<T> {
        let min = self.config.min_clip_secs;
        let max = self.config.max_clip_secs;
        let count = scenes.len();

        for index in 0..count {
            if index > 0 {
                let (prev_start, prev_end) = scenes[index - 1].span();
                let (start, _) = scenes[index].span();
                let gap = start - prev_end;

                let absorbable = gap > 0.0
                    && gap <= self.config.gap_tolerance_secs
                    && start - prev_start <= max
                    && start <= total_duration_sec;

                if absorbable {
                    scenes[index - 1].set_span(prev_start, start);
                } else if gap != 0.0 {
                    shift_preserving_duration(&mut scenes[index], prev_end);
                }
            }

            let (mut start, mut end) = scenes[index].span();

            if end - start > max {
                end = start + max;
            }

            if index == count - 1
                && total_duration_sec - end > self.config.tail_extension_threshold_secs
                && total_duration_sec - start <= max
            {
                end = total_duration_sec;
            }

            if end - start < min {
                end = (start + min).min(total_duration_sec);
            }

            end = end.min(total_duration_sec);
            start = start.min(end);
            if end - start < min - EPSILON {
                // Only the track end can cut a scene below the minimum
                warn!(
                    index,
                    start_sec = start,
                    end_sec = end,
                    total_duration_sec,
                    "Scene squeezed below minimum duration by the track end"
                );
            }
            scenes[index].set_span(start, end);
        }

        scenes
    }
}
