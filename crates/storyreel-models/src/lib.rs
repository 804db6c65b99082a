//! Shared data models for the Storyreel narration pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Word/segment level narration transcripts and the raw provider shapes
//!   they are normalized from
//! - Production scripts and their scenes
//! - Alignment diagnostics
//! - Flat clip time ranges used during final assembly
//! - Job identifiers

pub mod alignment;
pub mod clip;
pub mod job;
pub mod script;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use alignment::{AlignmentMethod, AlignmentResult, SceneKey};
pub use clip::ClipTimeRange;
pub use job::JobId;
pub use script::{ProductionScene, ProductionScript, TransitionHint};
pub use timestamp::format_track_time;
pub use transcript::{
    NarrationTimestamps, RawTranscript, TranscriptError, TranscriptResult, TranscriptSegment,
    WordTimestamp,
};
