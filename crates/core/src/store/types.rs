//! Types for the artifact store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A persisted upload.
#[derive(Debug, Clone)]
pub struct SavedUpload {
    /// Effective stored file name (sanitized, possibly uniquified).
    pub name: String,
    /// Absolute path of the stored file.
    pub path: PathBuf,
    /// Size of the stored content in bytes.
    pub size_bytes: u64,
}

/// A finished audiobook in the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct OutputEntry {
    /// File name within the output directory.
    pub name: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Creation time (falls back to modification time where the
    /// filesystem does not record birth time).
    pub created_at: DateTime<Utc>,
}
