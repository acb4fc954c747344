//! Types for the job lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of the singleton job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Idle,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// Whether a job is currently running.
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing)
    }
}

/// The singleton job record, overwritten in place by each accepted upload.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub status: JobStatus,
    /// Percentage in 0..=100, non-decreasing within one run.
    pub progress: u8,
    /// Human-readable status line, replaced on every update.
    pub message: String,
    /// Set when a job transitions idle to processing.
    pub start_time: Option<DateTime<Utc>>,
    /// Name of the produced artifact, set iff status is completed.
    pub output_file: Option<String>,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self {
            status: JobStatus::Idle,
            progress: 0,
            message: "Ready to process books".to_string(),
            start_time: None,
            output_file: None,
        }
    }
}

/// Processing options from the upload form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOptions {
    pub tts_model: String,
    pub use_gpu: bool,
    pub chapter_delimiter: String,
    pub silence_duration_ms: u32,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            tts_model: "xtts_v2".to_string(),
            use_gpu: true,
            chapter_delimiter: "Chapter".to_string(),
            silence_duration_ms: 500,
        }
    }
}

/// The active job token: identifies which worker owns the single slot.
///
/// A worker captures its token at claim time and compares it against
/// the live one to detect supersession; this comparison is the sole
/// cancellation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobToken(Uuid);

impl JobToken {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for JobToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
