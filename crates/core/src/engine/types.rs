//! Types for the conversion engine.

use std::path::PathBuf;

use crate::job::JobOptions;

/// One conversion to run: input document, target artifact, options.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Path of the uploaded document.
    pub input_path: PathBuf,
    /// Path the produced audiobook must be written to.
    pub output_path: PathBuf,
    /// Processing options from the upload form.
    pub options: JobOptions,
}

/// A coarse-grained progress update emitted during conversion.
#[derive(Debug, Clone)]
pub struct ConversionProgress {
    /// Percentage in 0..=100.
    pub percent: u8,
    /// Human-readable status line.
    pub message: String,
}
