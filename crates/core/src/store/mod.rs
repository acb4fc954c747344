//! Artifact store for uploads and finished audiobooks.
//!
//! Two independent filesystem populations: pending uploads and completed
//! outputs. Upload names are sanitized and made unique before writing;
//! output access is guarded against names escaping the output directory.

mod error;
mod fs_store;
mod types;

pub use error::StoreError;
pub use fs_store::ArtifactStore;
pub use types::{OutputEntry, SavedUpload};
