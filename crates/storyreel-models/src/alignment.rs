//! Alignment diagnostics.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a scene's span was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentMethod {
    /// Trusted fuzzy match against the transcript
    FuzzyMatch,
    /// A match was found but scored under the trust threshold
    Sequential,
    /// No match at all; placed by reading rate
    Estimated,
    /// Part of a scene split to respect the clip duration limit
    Split,
}

impl AlignmentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentMethod::FuzzyMatch => "fuzzy-match",
            AlignmentMethod::Sequential => "sequential",
            AlignmentMethod::Estimated => "estimated",
            AlignmentMethod::Split => "split",
        }
    }
}

impl fmt::Display for AlignmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an output scene relative to the input script.
///
/// `original` is the input scene number; `part` is 0 for an unsplit scene
/// and counts split parts from 0 otherwise. Dense output numbers are
/// assigned separately, once the expanded list is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct SceneKey {
    pub original: u32,
    pub part: u32,
}

impl SceneKey {
    pub fn new(original: u32, part: u32) -> Self {
        Self { original, part }
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.original, self.part)
    }
}

/// Per-output-scene alignment outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlignmentResult {
    pub scene_number: u32,
    pub start_sec: f64,
    pub end_sec: f64,
    /// Trust in the placement, 0.0 - 1.0
    pub confidence: f64,
    pub method: AlignmentMethod,
    #[serde(default)]
    pub was_split: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_scene_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_index: Option<u32>,
}

impl AlignmentResult {
    pub fn duration_sec(&self) -> f64 {
        self.end_sec - self.start_sec
    }

    /// Whether the placement came from a match at or above `threshold`.
    pub fn is_trusted(&self, threshold: f64) -> bool {
        match self.method {
            AlignmentMethod::FuzzyMatch | AlignmentMethod::Split => self.confidence >= threshold,
            AlignmentMethod::Sequential | AlignmentMethod::Estimated => false,
        }
    }
}
