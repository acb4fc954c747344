//! Error types for the artifact store.

use thiserror::Error;

/// Errors that can occur in the artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Client-supplied file name is empty or unusable after sanitizing.
    #[error("Invalid file name: {name}")]
    InvalidName { name: String },

    /// Requested output does not exist.
    #[error("File not found: {name}")]
    NotFound { name: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Creates a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}
