//! Division of a scene's narration across its split parts.
//!
//! Approximate: the text of each part is not re-timed against the audio,
//! only the part boundaries are.

use std::ops::Range;

use crate::text::split_sentences;

/// Narration text for part `part_index` of `total_parts`.
///
/// Whole sentences are dealt out evenly when there are at least as many
/// sentences as parts; otherwise words are.
pub fn partition(full_text: &str, part_index: usize, total_parts: usize) -> String {
    if total_parts <= 1 {
        return full_text.trim().to_string();
    }

    let sentences = split_sentences(full_text);
    if sentences.len() >= total_parts {
        return sentences[even_range(sentences.len(), part_index, total_parts)].join(" ");
    }

    let words: Vec<&str> = full_text.split_whitespace().collect();
    words[even_range(words.len(), part_index, total_parts)].join(" ")
}

/// Slice `index` of `len` items dealt into `parts` near-equal runs.
fn even_range(len: usize, index: usize, parts: usize) -> Range<usize> {
    let index = index.min(parts - 1);
    (len * index / parts)..(len * (index + 1) / parts)
}
