//! Filesystem-backed artifact store implementation.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

use super::error::StoreError;
use super::types::{OutputEntry, SavedUpload};

/// Document extensions accepted for upload.
const ALLOWED_EXTENSIONS: &[&str] = &[
    "epub", "pdf", "mobi", "txt", "html", "rtf", "fb2", "odt", "cbr", "cbz",
];

/// Extension of finished audiobooks.
const OUTPUT_EXTENSION: &str = "m4b";

/// Filesystem-backed store for uploads and finished audiobooks.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store over the given directories.
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Creates both holding directories if they do not exist yet.
    pub async fn ensure_dirs(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.upload_dir).await?;
        fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Checks whether a file name carries an accepted document extension.
    ///
    /// Case-insensitive; the name must contain at least one `.` separator.
    pub fn is_allowed_extension(name: &str) -> bool {
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                ALLOWED_EXTENSIONS.contains(&ext.as_str())
            }
            _ => false,
        }
    }

    /// Reduces a client-supplied name to a safe file name component.
    ///
    /// Keeps only the last path component, maps every byte outside
    /// `[A-Za-z0-9._-]` to `_`, and strips leading dots so the result can
    /// never traverse out of the holding directory.
    pub fn sanitize_file_name(name: &str) -> Option<String> {
        let last = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(name);

        let cleaned: String = last
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let cleaned = cleaned.trim_start_matches('.').to_string();
        if cleaned.is_empty() || cleaned.chars().all(|c| c == '_' || c == '.') {
            None
        } else {
            Some(cleaned)
        }
    }

    /// Persists upload content under a sanitized, collision-free name.
    ///
    /// An existing upload is never overwritten; a numeric suffix is
    /// appended until a free name is found.
    pub async fn save_upload(&self, name: &str, bytes: &[u8]) -> Result<SavedUpload, StoreError> {
        let safe_name =
            Self::sanitize_file_name(name).ok_or_else(|| StoreError::invalid_name(name))?;

        let unique_name = self.unique_upload_name(&safe_name).await?;
        let path = self.upload_dir.join(&unique_name);

        fs::write(&path, bytes).await?;

        Ok(SavedUpload {
            name: unique_name,
            path,
            size_bytes: bytes.len() as u64,
        })
    }

    /// Finds a free name in the upload directory, stat-checked.
    async fn unique_upload_name(&self, safe_name: &str) -> Result<String, StoreError> {
        if !fs::try_exists(self.upload_dir.join(safe_name)).await? {
            return Ok(safe_name.to_string());
        }

        let (stem, ext) = match safe_name.rsplit_once('.') {
            Some((s, e)) if !s.is_empty() => (s.to_string(), Some(e.to_string())),
            _ => (safe_name.to_string(), None),
        };

        for n in 1u32.. {
            let candidate = match &ext {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            };
            if !fs::try_exists(self.upload_dir.join(&candidate)).await? {
                return Ok(candidate);
            }
        }
        unreachable!("u32 name space exhausted");
    }

    /// Lists finished audiobooks in directory enumeration order.
    pub async fn list_outputs(&self) -> Result<Vec<OutputEntry>, StoreError> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.output_dir).await?;

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_output = name
                .rsplit_once('.')
                .map(|(_, ext)| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION))
                .unwrap_or(false);
            if !is_output {
                continue;
            }

            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }

            let created = meta.created().or_else(|_| meta.modified())?;
            entries.push(OutputEntry {
                name,
                size_bytes: meta.len(),
                created_at: DateTime::<Utc>::from(created),
            });
        }

        Ok(entries)
    }

    /// Resolves an output name to its path without touching the filesystem.
    ///
    /// Used by the engine to decide where to write the produced artifact.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Opens a finished audiobook for streaming.
    ///
    /// Returns the open file and its size. Names that are not a plain
    /// file name component are rejected as not found.
    pub async fn open_output(&self, name: &str) -> Result<(File, u64), StoreError> {
        if !Self::is_plain_file_name(name) {
            return Err(StoreError::not_found(name));
        }

        let path = self.output_dir.join(name);
        let file = File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::not_found(name)
            } else {
                StoreError::Io(e)
            }
        })?;

        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(StoreError::not_found(name));
        }

        Ok((file, meta.len()))
    }

    fn is_plain_file_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\')
    }
}
