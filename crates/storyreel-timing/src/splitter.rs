//! Splitting of over-long scenes into clip-sized parts.
//!
//! Every span handed to the video model must fit within the clip bounds.
//! A scene longer than the maximum is cut into parts, preferring cut points
//! where the narrator naturally pauses:
//!
//! 1. a transcript segment (sentence) boundary near the ideal cut,
//! 2. otherwise the widest silence between two words near it,
//! 3. otherwise the arithmetic cut point.
//!
//! The parts always cover the original span exactly. The final part ends on
//! the original end no matter what; if that leaves it too long, the tail is
//! split again. Each level closes at least one part of minimum length, so
//! the recursion terminates.

use storyreel_models::{NarrationTimestamps, ProductionScene, SceneKey, TransitionHint};

use crate::config::TimingConfig;
use crate::partition::partition;

/// Float slack for duration comparisons.
const EPSILON: f64 = 1e-9;

/// One part of a (possibly) split scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPart {
    pub key: SceneKey,
    pub scene: ProductionScene,
}

/// Cuts spans longer than the maximum clip duration into parts that each
/// fit the clip bounds.
pub struct DurationConstraintSplitter {
    config: TimingConfig,
}

impl DurationConstraintSplitter {
    /// Create a new splitter with the given configuration.
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Partition `[start_sec, end_sec]` of `scene` into clip-sized parts.
    ///
    /// A span already within the maximum comes back as a single part with
    /// identical bounds and text. Otherwise every part after the first
    /// continues the previous framing and receives its share of the
    /// narration text.
    pub fn split(
        &self,
        scene: &ProductionScene,
        start_sec: f64,
        end_sec: f64,
        timestamps: &NarrationTimestamps,
    ) -> Vec<SplitPart> {
        let spans = self.split_spans(start_sec, end_sec, timestamps);
        let total_parts = spans.len();

        if total_parts == 1 {
            let mut part = scene.clone();
            part.set_span(start_sec, end_sec);
            return vec![SplitPart {
                key: SceneKey::new(scene.scene_number, 0),
                scene: part,
            }];
        }

        spans
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                let mut part = scene.clone();
                part.set_span(start, end);
                part.narration_text = partition(&scene.narration_text, index, total_parts);
                if index > 0 {
                    part.transition_hint = TransitionHint::SameFraming;
                }
                SplitPart {
                    key: SceneKey::new(scene.scene_number, index as u32),
                    scene: part,
                }
            })
            .collect()
    }

    /// Contiguous spans covering `[start, end]`, each within the maximum.
    pub fn split_spans(
        &self,
        start: f64,
        end: f64,
        timestamps: &NarrationTimestamps,
    ) -> Vec<(f64, f64)> {
        let min = self.config.min_clip_secs;
        let max = self.config.max_clip_secs;
        let duration = end - start;
        if duration <= max + EPSILON {
            return vec![(start, end)];
        }

        let num_parts = (duration / max).ceil() as usize;
        let ideal = duration / num_parts as f64;

        let mut spans = Vec::with_capacity(num_parts);
        let mut current = start;

        for index in 0..num_parts - 1 {
            let target = current + ideal;
            let mut lo = current + min;
            let hi = (current + max).min(end - min);
            if index == num_parts - 2 {
                // Leave no more than one maximum-length part for the tail
                lo = lo.max(end - max);
            }
            let lo = lo.min(hi);

            let cut = self
                .find_segment_boundary(timestamps, target, lo, hi)
                .or_else(|| self.find_silence_gap(timestamps, target, lo, hi))
                .unwrap_or(target)
                .max(lo)
                .min(hi);

            spans.push((current, cut));
            current = cut;
        }

        if end - current > max + EPSILON {
            spans.extend(self.split_spans(current, end, timestamps));
        } else {
            spans.push((current, end));
        }
        spans
    }

    /// Search window around `target`, limited to `[lo, hi]`.
    fn window(&self, target: f64, lo: f64, hi: f64) -> (f64, f64) {
        let radius = self.config.boundary_window_secs;
        ((target - radius).max(lo), (target + radius).min(hi))
    }

    /// Sentence boundary closest to `target` within the window.
    ///
    /// The boundary point is the middle of the pause between one segment's
    /// end and the next one's start.
    fn find_segment_boundary(
        &self,
        timestamps: &NarrationTimestamps,
        target: f64,
        lo: f64,
        hi: f64,
    ) -> Option<f64> {
        let (from, to) = self.window(target, lo, hi);
        timestamps
            .segments
            .windows(2)
            .map(|pair| (pair[0].end + pair[1].start.max(pair[0].end)) / 2.0)
            .filter(|point| *point >= from && *point <= to)
            .min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()))
    }

    /// Middle of the widest inter-word silence within the window.
    fn find_silence_gap(
        &self,
        timestamps: &NarrationTimestamps,
        target: f64,
        lo: f64,
        hi: f64,
    ) -> Option<f64> {
        let (from, to) = self.window(target, lo, hi);
        timestamps
            .words
            .windows(2)
            .filter(|pair| pair[0].end >= from && pair[1].start <= to)
            .map(|pair| (pair[1].start - pair[0].end, pair[0].end))
            .filter(|(gap, _)| *gap > 0.0)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(gap, gap_start)| gap_start + gap / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_models::{TranscriptSegment, WordTimestamp};

    fn splitter() -> DurationConstraintSplitter {
        DurationConstraintSplitter::new(TimingConfig::default())
    }

    fn segment(text: &str, start: f64, end: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            end,
            words: Vec::new(),
        }
    }

    #[test]
    fn test_short_span_unchanged() {
        let scene = ProductionScene::new(3, "A short beat.");
        let parts = splitter().split(&scene, 2.0, 9.5, &NarrationTimestamps::default());

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].key, SceneKey::new(3, 0));
        assert_eq!(parts[0].scene.span(), Some((2.0, 9.5)));
        assert_eq!(parts[0].scene.narration_text, "A short beat.");
        assert_eq!(parts[0].scene.transition_hint, TransitionHint::Cut);
    }

    #[test]
    fn test_prefers_segment_boundary() {
        let ts = NarrationTimestamps::new(
            Vec::new(),
            vec![
                segment("First sentence.", 0.0, 6.0),
                segment("Second sentence.", 6.4, 15.0),
            ],
            15.0,
        );
        let spans = splitter().split_spans(0.0, 15.0, &ts);

        assert_eq!(spans.len(), 2);
        assert!((spans[0].1 - 6.2).abs() < 1e-9);
        assert!((spans[1].1 - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_falls_back_to_widest_silence() {
        let words = vec![
            WordTimestamp::new("a", 5.6, 6.0),
            WordTimestamp::new("b", 6.1, 6.5),
            // 1.0s pause
            WordTimestamp::new("c", 7.5, 7.9),
            WordTimestamp::new("d", 8.0, 8.4),
        ];
        let ts = NarrationTimestamps::new(words, Vec::new(), 15.0);
        let spans = splitter().split_spans(0.0, 15.0, &ts);

        assert_eq!(spans.len(), 2);
        assert!((spans[0].1 - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_parts_continue_framing_and_share_text() {
        let scene = ProductionScene::new(
            7,
            "Planets circle the sun. Some are rocky. Others are giant balls of gas.",
        );
        let parts = splitter().split(&scene, 0.0, 24.0, &NarrationTimestamps::default());

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].scene.transition_hint, TransitionHint::Cut);
        assert!(parts[1..]
            .iter()
            .all(|p| p.scene.transition_hint == TransitionHint::SameFraming));
        assert_eq!(parts[0].scene.narration_text, "Planets circle the sun.");
        assert_eq!(parts[2].scene.narration_text, "Others are giant balls of gas.");
        assert_eq!(
            parts.iter().map(|p| p.key.part).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(parts.iter().all(|p| p.key.original == 7));
    }

    #[test]
    fn test_early_boundaries_force_tail_recursion() {
        // Boundaries sit early in each window, so the first pass leaves an
        // oversized tail that must be split again.
        let ts = NarrationTimestamps::new(
            Vec::new(),
            vec![
                segment("a", 0.0, 4.0),
                segment("b", 4.0, 8.0),
                segment("c", 8.0, 30.0),
            ],
            30.0,
        );
        let spans = splitter().split_spans(0.0, 30.0, &ts);

        assert!((spans[0].0 - 0.0).abs() < 1e-9);
        assert!((spans.last().unwrap().1 - 30.0).abs() < 1e-9);
        for pair in spans.windows(2) {
            assert!((pair[0].1 - pair[1].0).abs() < 1e-9);
        }
        for (start, end) in &spans {
            assert!(end - start <= 10.0 + 1e-9);
            assert!(end - start >= 3.0 - 1e-9);
        }
    }
}
