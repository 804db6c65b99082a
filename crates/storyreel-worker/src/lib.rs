//! Narration alignment worker.
//!
//! This crate provides:
//! - Environment configuration for the timing engine
//! - The alignment stage (transcript normalization, alignment, quality
//!   assessment, clip repair)
//! - Structured job logging and metrics
//! - Job file loading and output writing

pub mod assembly;
pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod metrics;
pub mod stage;

pub use assembly::{clip_ranges_from_script, validate_for_assembly};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use job::{AlignmentJob, AlignmentJobOutput};
pub use logging::JobLogger;
pub use stage::{AlignmentQuality, AlignmentStage, APPROXIMATE_TIMING_WARNING};
