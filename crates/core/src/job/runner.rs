//! Background worker that drives one conversion to a terminal state.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::{CancelCheck, ConversionEngine, ConversionRequest};

use super::tracker::JobTracker;
use super::types::JobToken;

/// Buffer size for the engine progress channel.
const PROGRESS_BUFFER: usize = 16;

/// Spawns the worker for a claimed job and returns immediately.
///
/// The caller must already hold `token` from [`JobTracker::try_claim`].
/// Every exit path — success, failure, supersession, even a panicking
/// engine — ends with the token released, so a stuck slot can never
/// block future submissions. Failures are recorded into the job record
/// and never propagate to the upload caller.
pub fn spawn_job(
    tracker: Arc<JobTracker>,
    engine: Arc<dyn ConversionEngine>,
    token: JobToken,
    request: ConversionRequest,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_job(tracker, engine, token, request).await;
    })
}

async fn run_job(
    tracker: Arc<JobTracker>,
    engine: Arc<dyn ConversionEngine>,
    token: JobToken,
    request: ConversionRequest,
) {
    let input = request.input_path.display().to_string();
    info!(job = %token, input = %input, engine = engine.name(), "Job started");

    let (progress_tx, mut progress_rx) =
        mpsc::channel::<crate::engine::ConversionProgress>(PROGRESS_BUFFER);

    // Forward engine progress into the shared record; updates against a
    // stale token are dropped by the tracker.
    let forward_tracker = Arc::clone(&tracker);
    let forwarder = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            forward_tracker.update(&token, progress.percent, progress.message);
        }
    });

    let cancel_tracker = Arc::clone(&tracker);
    let cancel: CancelCheck = Arc::new(move || cancel_tracker.is_current(&token));

    // The engine runs in its own task so a panic inside it becomes a
    // JoinError instead of tearing down the runner before cleanup.
    let engine_task = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.convert(request, progress_tx, cancel).await })
    };

    match engine_task.await {
        Ok(Ok(output_file)) => {
            if tracker.complete(&token, &output_file) {
                info!(job = %token, output = %output_file, "Job completed");
            } else {
                debug!(job = %token, "Completed job was superseded, result discarded");
            }
        }
        Ok(Err(e)) if e.is_cancelled() => {
            // Superseded: abandon silently, no terminal transition.
            debug!(job = %token, "Job superseded, abandoning");
        }
        Ok(Err(e)) => {
            warn!(job = %token, error = %e, "Job failed");
            tracker.fail(&token, &e.to_string());
        }
        Err(join_err) => {
            error!(job = %token, error = %join_err, "Job worker panicked");
            tracker.fail(&token, "internal worker error");
        }
    }

    // Guaranteed cleanup; no-op when a terminal transition already
    // cleared the slot or a successor owns it.
    tracker.release(&token);

    forwarder.abort();
}
