//! Job lifecycle management.
//!
//! A single-slot state machine: at most one conversion runs at a time,
//! guarded by the active job token held in [`JobTracker`]. The HTTP
//! layer claims the slot, [`spawn_job`] drives the engine in the
//! background, and status polls read atomically published snapshots.

mod runner;
mod tracker;
mod types;

pub use runner::spawn_job;
pub use tracker::{JobTracker, SubmitError};
pub use types::{JobOptions, JobRecord, JobStatus, JobToken};
