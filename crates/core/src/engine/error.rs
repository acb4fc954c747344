//! Error types for the conversion engine.

use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The underlying analysis/synthesis stack is not installed.
    #[error("Conversion engine not available")]
    Unavailable,

    /// The job was superseded and the engine stopped cooperatively.
    #[error("Conversion cancelled")]
    Cancelled,

    /// Conversion failed.
    #[error("Conversion failed: {reason}")]
    Failed { reason: String },

    /// I/O error while producing the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a conversion failed error.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Whether the engine stopped because of supersession.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
