//! Configuration for narration timing alignment.
//!
//! The clip bounds come from the downstream video model: it renders clips
//! between 3 and 10 seconds long, so every scene span must fit that range.

use serde::{Deserialize, Serialize};

use crate::error::{TimingError, TimingResult};

/// Shortest clip the video model accepts (seconds).
pub const MIN_CLIP_SECS: f64 = 3.0;

/// Longest clip the video model accepts (seconds).
pub const MAX_CLIP_SECS: f64 = 10.0;

/// Tunables for matching, splitting, smoothing and clip repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Minimum scene/clip duration in seconds.
    pub min_clip_secs: f64,

    /// Maximum scene/clip duration in seconds. Longer scenes are split.
    pub max_clip_secs: f64,

    /// Fuzzy match score at which a match is trusted (0.0-1.0).
    pub match_threshold: f64,

    /// How far before the running frontier a match may start (seconds).
    ///
    /// Absorbs word boundary drift between consecutive scenes.
    pub backward_tolerance_secs: f64,

    /// Transcript words walked per candidate, as a multiple of query length.
    pub search_window_factor: usize,

    /// Reading rate used when no match is trusted (words per second).
    pub words_per_second: f64,

    /// Confidence multiplier applied to every part of a split scene.
    pub split_confidence_factor: f64,

    /// Gaps between consecutive scenes up to this size are absorbed into
    /// the earlier scene instead of shifting the later one (seconds).
    pub gap_tolerance_secs: f64,

    /// The last scene is extended to the end of the track only when it
    /// falls short by more than this (seconds).
    pub tail_extension_threshold_secs: f64,

    /// Clip overlaps up to this size are tolerated by the validator (seconds).
    pub overlap_tolerance_secs: f64,

    /// Search radius around an ideal split point for segment boundaries
    /// and silence gaps (seconds).
    pub boundary_window_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_clip_secs: MIN_CLIP_SECS,
            max_clip_secs: MAX_CLIP_SECS,
            match_threshold: 0.5,
            backward_tolerance_secs: 0.5,
            search_window_factor: 2,
            words_per_second: 2.5,
            split_confidence_factor: 0.9,
            gap_tolerance_secs: 0.1,
            tail_extension_threshold_secs: 1.0,
            overlap_tolerance_secs: 0.1,
            boundary_window_secs: 2.0,
        }
    }
}

impl TimingConfig {
    /// Stricter matching for clean studio narration.
    pub fn strict() -> Self {
        Self {
            match_threshold: 0.7,
            backward_tolerance_secs: 0.25,
            ..Self::default()
        }
    }

    /// Looser matching for noisy transcripts (music beds, child voices).
    pub fn lenient() -> Self {
        Self {
            match_threshold: 0.35,
            search_window_factor: 3,
            ..Self::default()
        }
    }

    /// Builder-style setter for the clip duration bounds.
    pub fn with_clip_bounds(mut self, min_secs: f64, max_secs: f64) -> Self {
        self.min_clip_secs = min_secs;
        self.max_clip_secs = max_secs;
        self
    }

    /// Builder-style setter for the trust threshold.
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builder-style setter for the fallback reading rate.
    pub fn with_words_per_second(mut self, wps: f64) -> Self {
        self.words_per_second = wps;
        self
    }

    /// Check the settings can actually be satisfied.
    ///
    /// The splitter needs room for two minimum-length parts inside one
    /// maximum-length span, so `max_clip_secs >= 2 * min_clip_secs`.
    pub fn validate(&self) -> TimingResult<()> {
        if !(self.min_clip_secs > 0.0) {
            return Err(TimingError::invalid_config(format!(
                "min_clip_secs must be positive, got {}",
                self.min_clip_secs
            )));
        }
        if self.max_clip_secs < 2.0 * self.min_clip_secs {
            return Err(TimingError::invalid_config(format!(
                "max_clip_secs ({}) must be at least twice min_clip_secs ({})",
                self.max_clip_secs, self.min_clip_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(TimingError::invalid_config(format!(
                "match_threshold must be within 0.0-1.0, got {}",
                self.match_threshold
            )));
        }
        if !(self.words_per_second > 0.0) {
            return Err(TimingError::invalid_config(format!(
                "words_per_second must be positive, got {}",
                self.words_per_second
            )));
        }
        if self.search_window_factor == 0 {
            return Err(TimingError::invalid_config(
                "search_window_factor must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.split_confidence_factor) {
            return Err(TimingError::invalid_config(format!(
                "split_confidence_factor must be within 0.0-1.0, got {}",
                self.split_confidence_factor
            )));
        }
        Ok(())
    }
}
