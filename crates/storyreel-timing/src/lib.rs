//! Narration-to-scene timing alignment.
//!
//! Maps an ordered production script onto a word-level narration
//! transcript so every scene gets a `[start, end]` span on the voice-over
//! track, no span exceeds the downstream video model's clip limit, and the
//! resulting timeline has no gaps or overlaps. A separate validator repairs
//! flat clip range lists right before assembly.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Fuzzy match  │──►│ Fallback     │──►│ Duration     │──►│ Timeline     │
//! │ (per scene)  │   │ estimate     │   │ splitter     │   │ smoother     │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! Everything here is synchronous and call-scoped. No component keeps
//! state between calls.
//!
//! # Usage
//!
//! ```rust,ignore
//! use storyreel_timing::{check_preconditions, SceneAligner, TimingConfig};
//!
//! check_preconditions(&timestamps)?;
//! let output = SceneAligner::new(TimingConfig::default()).align(&script, &timestamps);
//! ```

pub mod aligner;
pub mod config;
pub mod error;
pub mod fallback;
pub mod matcher;
pub mod partition;
pub mod smoother;
pub mod splitter;
pub mod text;
pub mod timed;
pub mod validator;


pub use aligner::{check_preconditions, AlignmentOutput, SceneAligner};
pub use config::{TimingConfig, MAX_CLIP_SECS, MIN_CLIP_SECS};
pub use error::{TimingError, TimingResult};
pub use fallback::SequentialFallbackEstimator;
pub use matcher::{FuzzyTimestampMatcher, TimestampMatch};
pub use partition::partition;
pub use smoother::TimelineSmoother;
pub use splitter::{DurationConstraintSplitter, SplitPart};
pub use text::normalize;
pub use timed::Timed;
pub use validator::{ClipTimingValidator, ClipTimingWarning, ClipValidation};
