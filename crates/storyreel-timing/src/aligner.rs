//! Scene-by-scene alignment of a production script to its narration.
//!
//! Each scene is placed in document order. The transcript search for a
//! scene always starts at the end of the previous scene: kids' narration
//! repeats boilerplate ("Time for a quiz!") often enough that an unanchored
//! search would happily match audio that was already used.
//!
//! Per scene:
//! 1. fuzzy match from the frontier; trusted at `match_threshold`,
//! 2. otherwise place by reading rate right after the previous scene,
//! 3. spans over the clip maximum are split into several output scenes.
//!
//! The expanded list is smoothed once, then renumbered densely.

use std::collections::BTreeMap;

use storyreel_models::{
    AlignmentMethod, AlignmentResult, NarrationTimestamps, ProductionScene, ProductionScript,
    SceneKey,
};
use tracing::{debug, info};

use crate::config::TimingConfig;
use crate::error::{TimingError, TimingResult};
use crate::fallback::SequentialFallbackEstimator;
use crate::matcher::FuzzyTimestampMatcher;
use crate::smoother::TimelineSmoother;
use crate::splitter::DurationConstraintSplitter;
use crate::timed::Timed;

/// Aligned script plus one diagnostic per output scene.
#[derive(Debug, Clone)]
pub struct AlignmentOutput {
    pub aligned_script: ProductionScript,
    pub alignment_results: Vec<AlignmentResult>,
}

impl AlignmentOutput {
    /// Number of output scenes per method.
    pub fn method_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for result in &self.alignment_results {
            *counts.entry(result.method.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Reject transcripts the aligner cannot place anything against.
///
/// The aligner itself never fails; on an empty or zero-length transcript it
/// degrades to low-confidence placements. Callers run this first.
pub fn check_preconditions(timestamps: &NarrationTimestamps) -> TimingResult<()> {
    if timestamps.is_empty() {
        return Err(TimingError::EmptyTranscript);
    }
    if !(timestamps.total_duration_sec > 0.0) {
        return Err(TimingError::ZeroDuration(timestamps.total_duration_sec));
    }
    Ok(())
}

/// Where one input scene landed, before splitting.
#[derive(Debug, Clone, Copy)]
struct Placement {
    start: f64,
    end: f64,
    confidence: f64,
    method: AlignmentMethod,
}

/// An output scene with its provenance, carried through smoothing.
#[derive(Debug, Clone)]
struct AlignedScene {
    key: SceneKey,
    scene: ProductionScene,
    confidence: f64,
    method: AlignmentMethod,
    was_split: bool,
}

impl Timed for AlignedScene {
    fn span(&self) -> (f64, f64) {
        Timed::span(&self.scene)
    }

    fn set_span(&mut self, start: f64, end: f64) {
        self.scene.set_span(start, end);
    }
}

/// Aligns a production script to its narration transcript.
///
/// Owns only configuration. Matcher, estimator, splitter and smoother are
/// built per call, so one aligner can serve many tracks concurrently.
pub struct SceneAligner {
    config: TimingConfig,
}

impl SceneAligner {
    /// Create a new aligner with the given configuration.
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Produce a new, timed script from `script` and its narration transcript.
    ///
    /// The input is not modified. The output may hold more scenes than the
    /// input when long scenes were split.
    pub fn align(
        &self,
        script: &ProductionScript,
        timestamps: &NarrationTimestamps,
    ) -> AlignmentOutput {
        let matcher = FuzzyTimestampMatcher::new(self.config.clone(), timestamps);
        let estimator = SequentialFallbackEstimator::new(self.config.clone());
        let splitter = DurationConstraintSplitter::new(self.config.clone());
        let smoother = TimelineSmoother::new(self.config.clone());
        let total = timestamps.total_duration_sec;

        let (placed, _) = script.scenes.iter().fold(
            (Vec::with_capacity(script.scenes.len()), 0.0),
            |(mut placed, last_end), scene| {
                let placement = self.place(scene, last_end, total, &matcher, &estimator);
                debug!(
                    scene_number = scene.scene_number,
                    method = %placement.method,
                    confidence = placement.confidence,
                    start_sec = placement.start,
                    end_sec = placement.end,
                    "Placed scene"
                );
                placed.extend(self.expand(scene, placement, &splitter, timestamps));
                (placed, placement.end)
            },
        );

        let smoothed = smoother.smooth(placed, total);
        let output = self.finish(script, smoothed);

        info!(
            input_scenes = script.scenes.len(),
            output_scenes = output.alignment_results.len(),
            methods = ?output.method_counts(),
            total_duration_sec = total,
            "Narration alignment complete"
        );
        output
    }

    fn place(
        &self,
        scene: &ProductionScene,
        last_end: f64,
        total: f64,
        matcher: &FuzzyTimestampMatcher<'_>,
        estimator: &SequentialFallbackEstimator,
    ) -> Placement {
        let candidate = matcher.best_window(&scene.narration_text, last_end);

        match candidate {
            Some(m) if m.is_trusted(self.config.match_threshold) => {
                let start = m.start.max(last_end);
                let end = if m.end > start {
                    m.end
                } else {
                    estimator.estimate(scene, start, total).1
                };
                Placement {
                    start,
                    end,
                    confidence: m.confidence,
                    method: AlignmentMethod::FuzzyMatch,
                }
            }
            weak => {
                let (start, end) = estimator.estimate(scene, last_end, total);
                let (confidence, method) = match weak {
                    Some(m) => (m.confidence, AlignmentMethod::Sequential),
                    None => (0.0, AlignmentMethod::Estimated),
                };
                Placement {
                    start,
                    end,
                    confidence,
                    method,
                }
            }
        }
    }

    /// One output scene, or several when the span is over the maximum.
    fn expand(
        &self,
        scene: &ProductionScene,
        placement: Placement,
        splitter: &DurationConstraintSplitter,
        timestamps: &NarrationTimestamps,
    ) -> Vec<AlignedScene> {
        let parts = splitter.split(scene, placement.start, placement.end, timestamps);
        if parts.len() == 1 {
            return parts
                .into_iter()
                .map(|part| AlignedScene {
                    key: part.key,
                    scene: part.scene,
                    confidence: placement.confidence,
                    method: placement.method,
                    was_split: false,
                })
                .collect();
        }

        debug!(
            scene_number = scene.scene_number,
            parts = parts.len(),
            duration_sec = placement.end - placement.start,
            "Split over-long scene"
        );
        let confidence = (placement.confidence * self.config.split_confidence_factor).clamp(0.0, 1.0);
        parts
            .into_iter()
            .map(|part| AlignedScene {
                key: part.key,
                scene: part.scene,
                confidence,
                method: AlignmentMethod::Split,
                was_split: true,
            })
            .collect()
    }

    /// Assign dense scene numbers and build the diagnostics.
    fn finish(&self, script: &ProductionScript, scenes: Vec<AlignedScene>) -> AlignmentOutput {
        let mut aligned_scenes = Vec::with_capacity(scenes.len());
        let mut alignment_results = Vec::with_capacity(scenes.len());

        for (index, aligned) in scenes.into_iter().enumerate() {
            let scene_number = index as u32 + 1;
            let (start_sec, end_sec) = aligned.span();
            let mut scene = aligned.scene;
            scene.scene_number = scene_number;

            alignment_results.push(AlignmentResult {
                scene_number,
                start_sec,
                end_sec,
                confidence: aligned.confidence,
                method: aligned.method,
                was_split: aligned.was_split,
                original_scene_number: aligned.was_split.then_some(aligned.key.original),
                part_index: aligned.was_split.then_some(aligned.key.part),
            });
            aligned_scenes.push(scene);
        }

        let mut aligned_script = ProductionScript {
            scenes: aligned_scenes,
            total_estimated_duration_sec: 0.0,
            extra: script.extra.clone(),
        };
        aligned_script.recompute_total_duration();

        AlignmentOutput {
            aligned_script,
            alignment_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_models::WordTimestamp;

    #[test]
    fn test_preconditions() {
        assert!(matches!(
            check_preconditions(&NarrationTimestamps::default()),
            Err(TimingError::EmptyTranscript)
        ));

        let zero = NarrationTimestamps::new(vec![WordTimestamp::new("hi", 0.0, 0.0)], Vec::new(), 0.0);
        assert!(matches!(check_preconditions(&zero), Err(TimingError::ZeroDuration(_))));

        let ok = NarrationTimestamps::from_words(vec![WordTimestamp::new("hi", 0.0, 0.5)]);
        assert!(check_preconditions(&ok).is_ok());
    }

    /// "red fish blue fish swim away home", one word every 0.5s.
    fn fish() -> NarrationTimestamps {
        let words = "red fish blue fish swim away home"
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| WordTimestamp::new(w, i as f64 * 0.5, i as f64 * 0.5 + 0.4))
            .collect();
        let mut ts = NarrationTimestamps::from_words(words);
        ts.total_duration_sec = 10.0;
        ts
    }

    fn place(text: &str, last_end: f64, ts: &NarrationTimestamps) -> Placement {
        let aligner = SceneAligner::new(TimingConfig::default());
        let matcher = FuzzyTimestampMatcher::new(aligner.config.clone(), ts);
        let estimator = SequentialFallbackEstimator::new(aligner.config.clone());
        aligner.place(
            &ProductionScene::new(2, text),
            last_end,
            ts.total_duration_sec,
            &matcher,
            &estimator,
        )
    }

    #[test]
    fn test_match_inside_tolerance_starts_at_frontier() {
        let ts = fish();
        // Match starts on the second "fish" at 1.5s, before the 2.0s frontier
        let placement = place("fish swim away home", 2.0, &ts);

        assert_eq!(placement.method, AlignmentMethod::FuzzyMatch);
        assert!((placement.start - 2.0).abs() < 1e-9);
        assert!((placement.end - 3.4).abs() < 1e-9);
    }

    #[test]
    fn test_match_ending_at_frontier_gets_estimated_end() {
        let ts = fish();
        // The only "fish" in reach ends before the frontier
        let placement = place("fish", 2.0, &ts);

        assert_eq!(placement.method, AlignmentMethod::FuzzyMatch);
        assert!((placement.start - 2.0).abs() < 1e-9);
        assert!((placement.end - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_script() {
        let ts = NarrationTimestamps::from_words(vec![WordTimestamp::new("hi", 0.0, 0.5)]);
        let output = SceneAligner::new(TimingConfig::default()).align(&ProductionScript::default(), &ts);
        assert!(output.aligned_script.is_empty());
        assert!(output.alignment_results.is_empty());
    }

    #[test]
    fn test_input_script_untouched() {
        let ts = NarrationTimestamps::from_words(vec![
            WordTimestamp::new("Hello", 0.0, 0.5),
            WordTimestamp::new("there.", 0.6, 1.0),
        ]);
        let script = ProductionScript::new(vec![ProductionScene::new(1, "Hello there.")]);
        let before = script.clone();

        let output = SceneAligner::new(TimingConfig::default()).align(&script, &ts);
        assert_eq!(script, before);
        assert!(output.aligned_script.scenes[0].start_sec.is_some());
    }
}
