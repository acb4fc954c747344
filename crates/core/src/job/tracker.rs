//! Lock-guarded container for the job record and active job token.

use chrono::Utc;
use std::sync::Mutex;
use thiserror::Error;

use super::types::{JobRecord, JobStatus, JobToken};

/// Error returned when the single job slot is taken.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Another job is already running")]
    AlreadyRunning,
}

/// Progress value a freshly claimed job starts at.
const INITIAL_PROGRESS: u8 = 10;

struct Inner {
    record: JobRecord,
    active: Option<JobToken>,
}

/// Single-writer, multi-reader holder of the job state.
///
/// The mutex is held only for field copies, so status polls never
/// block the worker for a meaningful amount of time and readers always
/// observe a consistent record. `try_claim` is the one atomic
/// check-and-set that enforces the at-most-one-job invariant.
pub struct JobTracker {
    inner: Mutex<Inner>,
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                record: JobRecord::default(),
                active: None,
            }),
        }
    }

    /// Returns an atomically published copy of the record.
    pub fn snapshot(&self) -> JobRecord {
        self.inner.lock().unwrap().record.clone()
    }

    /// Whether a job currently owns the slot.
    pub fn is_busy(&self) -> bool {
        self.inner.lock().unwrap().active.is_some()
    }

    /// Whether the given token still owns the slot.
    ///
    /// A worker polls this before every expensive step; `false` means
    /// it has been superseded and must stop mutating state.
    pub fn is_current(&self, token: &JobToken) -> bool {
        self.inner.lock().unwrap().active == Some(*token)
    }

    /// Claims the job slot in a single check-and-set.
    ///
    /// On success the record is reset for the new run: processing,
    /// initial progress, fresh start time, no output.
    pub fn try_claim(&self, filename: &str) -> Result<JobToken, SubmitError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.active.is_some() {
            return Err(SubmitError::AlreadyRunning);
        }

        let token = JobToken::new();
        inner.active = Some(token);
        inner.record = JobRecord {
            status: JobStatus::Processing,
            progress: INITIAL_PROGRESS,
            message: format!("Starting book processing: {}", filename),
            start_time: Some(Utc::now()),
            output_file: None,
        };
        Ok(token)
    }

    /// Records a progress update for the owning job.
    ///
    /// Stale tokens are ignored (returns `false`). Progress is clamped
    /// to be non-decreasing within the run.
    pub fn update(&self, token: &JobToken, progress: u8, message: impl Into<String>) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.active != Some(*token) {
            return false;
        }
        inner.record.progress = inner.record.progress.max(progress.min(100));
        inner.record.message = message.into();
        true
    }

    /// Terminal transition to completed; releases the slot.
    pub fn complete(&self, token: &JobToken, output_file: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.active != Some(*token) {
            return false;
        }
        inner.record.status = JobStatus::Completed;
        inner.record.progress = 100;
        inner.record.message = format!("Audiobook generated successfully: {}", output_file);
        inner.record.output_file = Some(output_file.to_string());
        inner.active = None;
        true
    }

    /// Terminal transition to error; releases the slot.
    pub fn fail(&self, token: &JobToken, reason: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.active != Some(*token) {
            return false;
        }
        inner.record.status = JobStatus::Error;
        inner.record.progress = 0;
        inner.record.message = format!("Processing failed: {}", reason);
        inner.record.output_file = None;
        inner.active = None;
        true
    }

    /// Releases the slot if the token still owns it.
    ///
    /// Runs on every worker exit path; a superseded worker cannot
    /// clobber a successor's claim through this.
    pub fn release(&self, token: &JobToken) {
        let mut inner = self.inner.lock().unwrap();
        if inner.active == Some(*token) {
            inner.active = None;
        }
    }
}
