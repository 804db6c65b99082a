//! Worker configuration.

use std::path::PathBuf;

use storyreel_timing::TimingConfig;
use tracing::warn;

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Engine tunables
    pub timing: TimingConfig,
    /// Fraction of untrusted scenes at which a job is flagged as
    /// approximately timed
    pub low_confidence_ratio: f64,
    /// Directory for alignment output files
    pub output_dir: PathBuf,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            low_confidence_ratio: 0.5,
            output_dir: PathBuf::from("./out"),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse = |key: &str, default: f64| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        let base = timing_preset(lookup("STORYREEL_TIMING_PRESET").as_deref());
        let timing = TimingConfig {
            min_clip_secs: parse("STORYREEL_MIN_CLIP_SECS", base.min_clip_secs),
            max_clip_secs: parse("STORYREEL_MAX_CLIP_SECS", base.max_clip_secs),
            ..base.clone()
        }
        .with_match_threshold(parse("STORYREEL_MATCH_THRESHOLD", base.match_threshold))
        .with_words_per_second(parse("STORYREEL_WORDS_PER_SECOND", base.words_per_second));

        Self {
            timing,
            low_confidence_ratio: parse(
                "STORYREEL_LOW_CONFIDENCE_RATIO",
                defaults.low_confidence_ratio,
            ),
            output_dir: lookup("STORYREEL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }

    pub fn validate(&self) -> WorkerResult<()> {
        self.timing.validate()?;
        if !(0.0..=1.0).contains(&self.low_confidence_ratio) {
            return Err(WorkerError::config_error(format!(
                "low_confidence_ratio must be within 0.0-1.0, got {}",
                self.low_confidence_ratio
            )));
        }
        Ok(())
    }
}

/// Base engine settings named by `STORYREEL_TIMING_PRESET`.
fn timing_preset(name: Option<&str>) -> TimingConfig {
    match name.map(|n| n.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("default") => TimingConfig::default(),
        Some("strict") => TimingConfig::strict(),
        Some("lenient") => TimingConfig::lenient(),
        Some(other) => {
            warn!(preset = other, "Unknown timing preset, using default");
            TimingConfig::default()
        }
    }
}
