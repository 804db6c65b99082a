//! Narration transcript models.
//!
//! [`NarrationTimestamps`] is the one shape the timing engine reads.
//! Transcription providers answer in several incompatible layouts, captured
//! by [`RawTranscript`]; each layout has its own parser that normalizes it
//! before anything downstream sees it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for transcript normalization.
pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// Errors raised while normalizing a raw transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Unrecognized transcript shape: {0}")]
    UnrecognizedShape(String),

    #[error("Malformed chunk {index}: {message}")]
    MalformedChunk { index: usize, message: String },
}

impl TranscriptError {
    pub fn malformed_chunk(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedChunk {
            index,
            message: message.into(),
        }
    }
}

/// A single transcribed word with its audio span in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordTimestamp {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl WordTimestamp {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// A provider grouping of words, usually one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<WordTimestamp>,
}

/// Normalized word and segment timing for one narration track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NarrationTimestamps {
    pub words: Vec<WordTimestamp>,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
    pub total_duration_sec: f64,
}

impl NarrationTimestamps {
    pub fn new(
        words: Vec<WordTimestamp>,
        segments: Vec<TranscriptSegment>,
        total_duration_sec: f64,
    ) -> Self {
        Self {
            words,
            segments,
            total_duration_sec,
        }
    }

    /// Build from words alone, deriving sentence segments and the duration.
    pub fn from_words(words: Vec<WordTimestamp>) -> Self {
        let words = sorted_words(words);
        let segments = group_into_sentences(&words);
        let total = last_end(&words, &segments);
        Self::new(words, segments, total)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Index of the first word starting at or after `sec`.
    pub fn first_word_at_or_after(&self, sec: f64) -> usize {
        self.words.partition_point(|w| w.start < sec)
    }
}

/// Raw transcription response, in whichever layout the provider used.
///
/// Variants are told apart by their required top-level field, so the
/// segmented layout must be tried before the flat word list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawTranscript {
    Segmented(SegmentedTranscript),
    Chunked(ChunkedTranscript),
    FlatWords(FlatWordTranscript),
}

/// `{segments: [...], words?: [...], duration?}`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SegmentedTranscript {
    pub segments: Vec<TranscriptSegment>,
    #[serde(default)]
    pub words: Vec<WordTimestamp>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// `{chunks: [{text, timestamp: [start, end]}], duration?}`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChunkedTranscript {
    pub chunks: Vec<TranscriptChunk>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// One word-level chunk. Providers leave the end open on the final chunk.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptChunk {
    pub text: String,
    pub timestamp: (Option<f64>, Option<f64>),
}

/// `{words: [...], duration?}`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FlatWordTranscript {
    pub words: Vec<WordTimestamp>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl RawTranscript {
    /// Parse a provider response body.
    pub fn from_json(raw: &str) -> TranscriptResult<Self> {
        serde_json::from_str(raw).map_err(|e| TranscriptError::UnrecognizedShape(e.to_string()))
    }

    /// Short name of the layout, for logging.
    pub fn shape(&self) -> &'static str {
        match self {
            RawTranscript::Segmented(_) => "segmented",
            RawTranscript::Chunked(_) => "chunked",
            RawTranscript::FlatWords(_) => "flat_words",
        }
    }

    /// Normalize into the engine's transcript structure.
    pub fn into_timestamps(self) -> TranscriptResult<NarrationTimestamps> {
        match self {
            RawTranscript::Segmented(t) => Ok(parse_segmented(t)),
            RawTranscript::Chunked(t) => parse_chunked(t),
            RawTranscript::FlatWords(t) => Ok(parse_flat_words(t)),
        }
    }
}

fn parse_segmented(t: SegmentedTranscript) -> NarrationTimestamps {
    let words = if t.words.is_empty() {
        t.segments
            .iter()
            .flat_map(|s| s.words.iter().cloned())
            .collect()
    } else {
        t.words
    };
    let words = sorted_words(words);
    let mut segments = t.segments;
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));

    let total = explicit_or(t.duration, last_end(&words, &segments));
    NarrationTimestamps::new(words, segments, total)
}

fn parse_chunked(t: ChunkedTranscript) -> TranscriptResult<NarrationTimestamps> {
    let mut words = Vec::with_capacity(t.chunks.len());
    for (index, chunk) in t.chunks.iter().enumerate() {
        let start = chunk
            .timestamp
            .0
            .ok_or_else(|| TranscriptError::malformed_chunk(index, "missing start time"))?;
        let end = match chunk.timestamp.1 {
            Some(end) => end,
            None => t
                .chunks
                .get(index + 1)
                .and_then(|next| next.timestamp.0)
                .unwrap_or(start),
        };
        if end < start {
            return Err(TranscriptError::malformed_chunk(
                index,
                format!("end {end} precedes start {start}"),
            ));
        }
        words.push(WordTimestamp::new(chunk.text.trim(), start, end));
    }

    let mut timestamps = NarrationTimestamps::from_words(words);
    timestamps.total_duration_sec = explicit_or(t.duration, timestamps.total_duration_sec);
    Ok(timestamps)
}

fn parse_flat_words(t: FlatWordTranscript) -> NarrationTimestamps {
    let mut timestamps = NarrationTimestamps::from_words(t.words);
    timestamps.total_duration_sec = explicit_or(t.duration, timestamps.total_duration_sec);
    timestamps
}

fn sorted_words(mut words: Vec<WordTimestamp>) -> Vec<WordTimestamp> {
    for w in &mut words {
        let trimmed = w.word.trim();
        if trimmed.len() != w.word.len() {
            w.word = trimmed.to_string();
        }
    }
    words.sort_by(|a, b| a.start.total_cmp(&b.start));
    words
}

fn explicit_or(duration: Option<f64>, fallback: f64) -> f64 {
    duration.filter(|d| *d > 0.0).unwrap_or(fallback)
}

fn last_end(words: &[WordTimestamp], segments: &[TranscriptSegment]) -> f64 {
    words
        .iter()
        .map(|w| w.end)
        .chain(segments.iter().map(|s| s.end))
        .fold(0.0, f64::max)
}

fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(['"', '\'', ')', ']'])
        .ends_with(['.', '!', '?'])
}

/// Group words into sentence segments at terminal punctuation.
fn group_into_sentences(words: &[WordTimestamp]) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    let mut current: Vec<WordTimestamp> = Vec::new();

    for word in words {
        current.push(word.clone());
        if ends_sentence(&word.word) {
            segments.push(segment_from(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        segments.push(segment_from(current));
    }
    segments
}

fn segment_from(words: Vec<WordTimestamp>) -> TranscriptSegment {
    let start = words.first().map(|w| w.start).unwrap_or(0.0);
    let end = words.last().map(|w| w.end).unwrap_or(start);
    let text = words
        .iter()
        .map(|w| w.word.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    TranscriptSegment {
        text,
        start,
        end,
        words,
    }
}
