//! Trait definitions for the conversion engine.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::error::EngineError;
use super::types::{ConversionProgress, ConversionRequest};

/// Cooperative cancellation probe.
///
/// Returns `false` once the job has been superseded; the engine must
/// consult it before every expensive step and stop without producing
/// an artifact when it trips.
pub type CancelCheck = Arc<dyn Fn() -> bool + Send + Sync>;

/// An engine that turns an uploaded document into an audiobook.
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    /// Returns the name of this engine implementation.
    fn name(&self) -> &str;

    /// Whether the underlying analysis/synthesis stack is usable.
    fn available(&self) -> bool;

    /// Runs one conversion.
    ///
    /// Progress updates go through `progress_tx`; if the receiver is
    /// dropped, conversion continues without progress reporting. On
    /// success the produced artifact exists at `request.output_path`
    /// and its file name is returned.
    async fn convert(
        &self,
        request: ConversionRequest,
        progress_tx: mpsc::Sender<ConversionProgress>,
        cancel: CancelCheck,
    ) -> Result<String, EngineError>;
}
