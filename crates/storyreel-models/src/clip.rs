//! Clip time ranges used by final assembly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where one rendered clip sits on the narration track.
///
/// Deliberately knows nothing about narration text; assembly trims and
/// concatenates clips purely by these bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipTimeRange {
    pub clip_number: u32,
    pub audio_start_sec: f64,
    pub audio_end_sec: f64,
}

impl ClipTimeRange {
    pub fn new(clip_number: u32, audio_start_sec: f64, audio_end_sec: f64) -> Self {
        Self {
            clip_number,
            audio_start_sec,
            audio_end_sec,
        }
    }

    pub fn duration_sec(&self) -> f64 {
        self.audio_end_sec - self.audio_start_sec
    }
}
