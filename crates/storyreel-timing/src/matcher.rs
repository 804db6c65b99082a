//! Fuzzy text-to-transcript matching.
//!
//! Finds the contiguous run of transcript words that best covers a piece of
//! narration text. Comparison is token containment rather than edit
//! distance, and each candidate start only walks a bounded window of the
//! transcript, so repeated vocabulary cannot drag a match far downstream.
//!
//! Cost is O(N·W) per query: N searchable words after the time bound, W at
//! most `search_window_factor` times the query length. The aligner advances
//! the time bound scene by scene, so N shrinks as alignment proceeds.

use storyreel_models::NarrationTimestamps;

use crate::config::TimingConfig;
use crate::text::{normalized_words, words_match};

/// A located span with its match score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampMatch {
    pub start: f64,
    pub end: f64,
    /// Matched query words / query words, 0.0-1.0
    pub confidence: f64,
}

impl TimestampMatch {
    pub fn is_trusted(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

/// Score of one candidate window.
#[derive(Debug, Clone, Copy)]
struct WindowScore {
    score: f64,
    first_hit: usize,
    last_hit: usize,
}

/// Matcher over one transcript. Transcript words are normalized once, at
/// construction, and reused for every query.
pub struct FuzzyTimestampMatcher<'a> {
    config: TimingConfig,
    timestamps: &'a NarrationTimestamps,
    words: Vec<String>,
}

impl<'a> FuzzyTimestampMatcher<'a> {
    pub fn new(config: TimingConfig, timestamps: &'a NarrationTimestamps) -> Self {
        let words = timestamps
            .words
            .iter()
            .map(|w| normalized_words(&w.word).concat())
            .collect();
        Self {
            config,
            timestamps,
            words,
        }
    }

    /// Best trusted span for `text` starting no earlier than
    /// `min_start_sec` minus the backward tolerance.
    ///
    /// Returns `None` when nothing scores at or above the trust threshold.
    pub fn find_range(&self, text: &str, min_start_sec: f64) -> Option<TimestampMatch> {
        self.best_window(text, min_start_sec)
            .filter(|m| m.is_trusted(self.config.match_threshold))
    }

    /// Best-scoring span regardless of the trust threshold.
    ///
    /// `None` only when no transcript word matched at all.
    pub fn best_window(&self, text: &str, min_start_sec: f64) -> Option<TimestampMatch> {
        let query = normalized_words(text);
        if query.is_empty() || self.words.is_empty() {
            return None;
        }

        let bound = min_start_sec - self.config.backward_tolerance_secs;
        let first = self.timestamps.first_word_at_or_after(bound);
        let window = query.len() * self.config.search_window_factor;

        let mut best: Option<WindowScore> = None;
        for start in first..self.words.len() {
            if self.words[start].is_empty() {
                continue;
            }
            let Some(candidate) = self.score_window(&query, start, window) else {
                continue;
            };
            if best.map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
            // Earliest perfect match wins; nothing later can beat it.
            if candidate.score >= 1.0 {
                break;
            }
        }

        best.map(|b| TimestampMatch {
            start: self.timestamps.words[b.first_hit].start,
            end: self.timestamps.words[b.last_hit].end,
            confidence: b.score.min(1.0),
        })
    }

    /// Walk query and transcript together from `start`, allowing one-token
    /// insertions on either side, until the query is exhausted or the
    /// transcript cursor has moved `window` words.
    fn score_window(&self, query: &[String], start: usize, window: usize) -> Option<WindowScore> {
        let limit = (start + window).min(self.words.len());
        let mut qi = 0;
        let mut ti = start;
        let mut hits = 0usize;
        let mut first_hit = None;
        let mut last_hit = start;

        while qi < query.len() && ti < limit {
            let word = &self.words[ti];
            if word.is_empty() {
                ti += 1;
                continue;
            }

            if words_match(&query[qi], word) {
                hits += 1;
                first_hit.get_or_insert(ti);
                last_hit = ti;
                qi += 1;
                ti += 1;
            } else if ti + 1 < limit && words_match(&query[qi], &self.words[ti + 1]) {
                // Transcript has an extra token
                ti += 1;
            } else if qi + 1 < query.len() && words_match(&query[qi + 1], word) {
                // Narration word missing from the audio
                qi += 1;
            } else {
                qi += 1;
                ti += 1;
            }
        }

        first_hit.map(|first_hit| WindowScore {
            score: hits as f64 / query.len() as f64,
            first_hit,
            last_hit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_models::WordTimestamp;

    /// One word every 0.5s, each 0.4s long.
    fn transcript(text: &str) -> NarrationTimestamps {
        let words = text
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| {
                let start = i as f64 * 0.5;
                WordTimestamp::new(w, start, start + 0.4)
            })
            .collect();
        NarrationTimestamps::from_words(words)
    }

    #[test]
    fn test_exact_match() {
        let ts = transcript("Hello friends. Today we visit the moon. It is very far away.");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &ts);

        let m = matcher.find_range("Today we visit the moon.", 0.0).unwrap();
        assert!((m.start - 1.0).abs() < 1e-9);
        assert!((m.end - 3.4).abs() < 1e-9);
        assert!((m.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tolerates_punctuation_and_case() {
        let ts = transcript("WOW, look at THAT rainbow!");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &ts);

        let m = matcher.find_range("wow look at that rainbow", 0.0).unwrap();
        assert!((m.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_merged_transcript_token() {
        // "icecream" came back as one token
        let ts = transcript("We love icecream on sunny days");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &ts);

        let m = matcher.find_range("We love ice cream on sunny days", 0.0).unwrap();
        assert!(m.confidence >= 0.8);
        assert!((m.start - 0.0).abs() < 1e-9);
        assert!((m.end - 2.9).abs() < 1e-9);
    }

    #[test]
    fn test_respects_time_bound() {
        let ts = transcript("Time for a quiz! One two three. Time for a quiz! Four five six.");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &ts);

        let first = matcher.find_range("Time for a quiz!", 0.0).unwrap();
        assert!((first.start - 0.0).abs() < 1e-9);

        // Frontier past the first occurrence: must find the second one
        let second = matcher.find_range("Time for a quiz!", first.end).unwrap();
        assert!((second.start - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_backward_tolerance() {
        let ts = transcript("alpha beta gamma delta");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &ts);

        // "beta" starts at 0.5; a frontier of 0.9 still reaches it
        let m = matcher.find_range("beta gamma", 0.9).unwrap();
        assert!((m.start - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_weak_match_is_not_trusted() {
        let ts = transcript("the cat sat on the mat");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &ts);

        let text = "my dog sat by his log";
        assert!(matcher.find_range(text, 0.0).is_none());

        let weak = matcher.best_window(text, 0.0).unwrap();
        assert!(weak.confidence < 0.5);
    }

    #[test]
    fn test_walk_stops_at_window() {
        // Dash tokens normalize to nothing but still use up the window of
        // 2 x 3 transcript words.
        let spread = transcript("sun - - - - - - moon stars");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &spread);
        let m = matcher.best_window("sun moon stars", 0.0).unwrap();
        assert!(m.confidence < 1.0);
        assert!((m.start - 3.5).abs() < 1e-9);

        let wider = FuzzyTimestampMatcher::new(TimingConfig::lenient(), &spread);
        let m = wider.best_window("sun moon stars", 0.0).unwrap();
        assert!((m.confidence - 1.0).abs() < 1e-9);

        let packed = transcript("sun moon stars");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &packed);
        let m = matcher.best_window("sun moon stars", 0.0).unwrap();
        assert!((m.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_match() {
        let ts = transcript("one two three");
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &ts);
        assert!(matcher.best_window("zebra", 0.0).is_none());
        assert!(matcher.best_window("", 0.0).is_none());
    }

    #[test]
    fn test_empty_transcript() {
        let ts = NarrationTimestamps::default();
        let matcher = FuzzyTimestampMatcher::new(TimingConfig::default(), &ts);
        assert!(matcher.best_window("anything", 0.0).is_none());
    }
}
