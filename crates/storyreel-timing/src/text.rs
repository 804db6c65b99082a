//! Text normalization for comparing script narration with transcripts.
//!
//! Transcription output differs from the script in casing, punctuation
//! and spacing. Both sides go through the same normalization before any
//! comparison.

use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^.!?]+(?:[.!?]+["'\)\]]*)?"#).unwrap());

/// Lowercase, strip punctuation, collapse whitespace, trim.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Normalized, non-empty words of `text`.
pub fn normalized_words(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split at sentence-terminal punctuation, keeping the punctuation.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Token containment: equal, or either word contains the other.
///
/// Absorbs transcription splitting ("ice" "cream") and merging
/// ("icecream"). Empty words never match.
pub fn words_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(b) || b.contains(a)
}
