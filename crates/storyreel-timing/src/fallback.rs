//! Reading-rate placement for scenes without a trusted match.

use storyreel_models::ProductionScene;

use crate::config::TimingConfig;

/// Places a scene right after the previous one, sized by word count.
///
/// Starting at the running frontier keeps scenes in document order without
/// any transcript search.
pub struct SequentialFallbackEstimator {
    config: TimingConfig,
}

impl SequentialFallbackEstimator {
    /// Create a new estimator using the reading rate and clip bounds from
    /// `config`.
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Reading time for `word_count` words, clamped to the clip bounds.
    pub fn duration_for_words(&self, word_count: usize) -> f64 {
        (word_count as f64 / self.config.words_per_second)
            .clamp(self.config.min_clip_secs, self.config.max_clip_secs)
    }

    /// Span for `scene` starting at `last_end_sec`, never past the track end.
    pub fn estimate(
        &self,
        scene: &ProductionScene,
        last_end_sec: f64,
        total_duration_sec: f64,
    ) -> (f64, f64) {
        let start = last_end_sec;
        let end = (start + self.duration_for_words(scene.word_count()))
            .min(total_duration_sec)
            .max(start);
        (start, end)
    }
}
