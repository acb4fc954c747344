//! Timer-driven stand-in for the real NLP/TTS pipeline.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::EngineConfig;

use super::error::EngineError;
use super::traits::{CancelCheck, ConversionEngine};
use super::types::{ConversionProgress, ConversionRequest};

/// Placeholder artifact content written on success.
const PLACEHOLDER_CONTENT: &[u8] = b"This would be the generated audiobook file";

/// Progress range covered by the text analysis phase.
const ANALYSIS_RANGE: (u8, u8) = (10, 50);

/// Progress range covered by the audio synthesis phase.
const SYNTHESIS_RANGE: (u8, u8) = (50, 90);

/// Step between progress updates within a phase.
const PROGRESS_STEP: u8 = 5;

/// Engine that simulates the two pipeline phases with sleeps.
///
/// Emits the same progress sequence a real conversion would: text
/// analysis from 10 to 45, audio synthesis from 50 to 85, then a final
/// assembly pause before the artifact appears. Cancellation is checked
/// before every sleep so a superseded job stops within one step.
pub struct SimulatedEngine {
    config: EngineConfig,
}

impl SimulatedEngine {
    /// Creates a simulated engine with the given pacing.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Creates an engine with default pacing.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    async fn run_phase(
        &self,
        range: (u8, u8),
        step_delay: Duration,
        message_prefix: &str,
        progress_tx: &mpsc::Sender<ConversionProgress>,
        cancel: &CancelCheck,
    ) -> Result<(), EngineError> {
        let mut percent = range.0;
        while percent < range.1 {
            if !cancel() {
                return Err(EngineError::Cancelled);
            }
            tokio::time::sleep(step_delay).await;

            let _ = progress_tx
                .send(ConversionProgress {
                    percent,
                    message: format!("{}... {}%", message_prefix, percent),
                })
                .await;

            percent = percent.saturating_add(PROGRESS_STEP);
        }
        Ok(())
    }
}

#[async_trait]
impl ConversionEngine for SimulatedEngine {
    fn name(&self) -> &str {
        "simulated"
    }

    fn available(&self) -> bool {
        self.config.available
    }

    async fn convert(
        &self,
        request: ConversionRequest,
        progress_tx: mpsc::Sender<ConversionProgress>,
        cancel: CancelCheck,
    ) -> Result<String, EngineError> {
        if !self.available() {
            return Err(EngineError::Unavailable);
        }

        debug!(
            input = %request.input_path.display(),
            tts_model = %request.options.tts_model,
            "Starting simulated conversion"
        );

        self.run_phase(
            ANALYSIS_RANGE,
            Duration::from_millis(self.config.analysis_step_ms),
            "Processing book text",
            &progress_tx,
            &cancel,
        )
        .await?;

        self.run_phase(
            SYNTHESIS_RANGE,
            Duration::from_millis(self.config.synthesis_step_ms),
            "Generating audio",
            &progress_tx,
            &cancel,
        )
        .await?;

        // Final assembly
        if !cancel() {
            return Err(EngineError::Cancelled);
        }
        tokio::time::sleep(Duration::from_millis(self.config.finalize_ms)).await;

        tokio::fs::write(&request.output_path, PLACEHOLDER_CONTENT).await?;

        let output_name = request
            .output_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| EngineError::failed("output path has no file name"))?;

        Ok(output_name)
    }
}
