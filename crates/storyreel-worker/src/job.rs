//! Alignment job input and output files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyreel_models::{AlignmentResult, ClipTimeRange, JobId, ProductionScript, RawTranscript};

use crate::error::WorkerResult;
use crate::stage::AlignmentQuality;

/// One narration track and the script to align against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentJob {
    /// Generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub script: ProductionScript,
    pub transcript: RawTranscript,
}

impl AlignmentJob {
    pub async fn load(path: &Path) -> WorkerResult<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Everything downstream stages need from one alignment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentJobOutput {
    pub job_id: JobId,
    pub aligned_script: ProductionScript,
    pub alignment_results: Vec<AlignmentResult>,
    pub quality: AlignmentQuality,
    /// Clip ranges ready for assembly, already repaired
    pub clips: Vec<ClipTimeRange>,
    #[serde(default)]
    pub clip_warnings: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl AlignmentJobOutput {
    /// `<dir>/<job_id>.alignment.json`
    pub fn default_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.alignment.json", self.job_id))
    }

    /// Write as pretty JSON, creating parent directories as needed.
    pub async fn write(&self, path: &Path) -> WorkerResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
