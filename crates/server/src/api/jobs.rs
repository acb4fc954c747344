//! Upload, status, and completed-jobs handlers.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use bookvox_core::{
    spawn_job, ArtifactStore, ConversionRequest, JobOptions, JobRecord, StoreError, SubmitError,
};

use super::ErrorResponse;
use crate::state::AppState;

/// Suffix appended to the upload stem to derive the artifact name.
const OUTPUT_SUFFIX: &str = "_audiobook.m4b";

/// Response for an accepted upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Effective stored name of the upload (after sanitizing)
    pub filename: String,
}

/// One row in the completed jobs listing
#[derive(Debug, Serialize)]
pub struct JobRow {
    pub filename: String,
    pub size: u64,
    pub created: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Accepts a document upload and starts the background conversion.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    // Advisory early rejection; the claim below is the authoritative gate.
    if state.jobs().is_busy() {
        return Err(bad_request("Another job is already running"));
    }

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut options = JobOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Malformed upload: {}", e)))?;
                file = Some((filename, bytes.to_vec()));
            }
            "tts_model" => {
                if let Ok(value) = field.text().await {
                    if !value.is_empty() {
                        options.tts_model = value;
                    }
                }
            }
            "use_gpu" => {
                if let Ok(value) = field.text().await {
                    options.use_gpu = value.eq_ignore_ascii_case("true");
                }
            }
            "chapter_delimiter" => {
                if let Ok(value) = field.text().await {
                    if !value.is_empty() {
                        options.chapter_delimiter = value;
                    }
                }
            }
            "silence_duration" => {
                if let Ok(value) = field.text().await {
                    if let Ok(ms) = value.parse() {
                        options.silence_duration_ms = ms;
                    }
                }
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| bad_request("No file provided"))?;

    if filename.is_empty() {
        return Err(bad_request("No file selected"));
    }

    if !ArtifactStore::is_allowed_extension(&filename) {
        return Err(bad_request("File type not allowed"));
    }

    let saved = state
        .store()
        .save_upload(&filename, &bytes)
        .await
        .map_err(|e| match e {
            StoreError::InvalidName { .. } => bad_request("No file selected"),
            other => {
                warn!(error = %other, "Failed to persist upload");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to store upload")),
                )
            }
        })?;

    // Atomic claim of the single job slot
    let token = state.jobs().try_claim(&saved.name).map_err(|e| match e {
        SubmitError::AlreadyRunning => bad_request("Another job is already running"),
    })?;

    let stem = saved
        .name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(saved.name.as_str());
    let output_name = format!("{}{}", stem, OUTPUT_SUFFIX);

    let request = ConversionRequest {
        input_path: saved.path.clone(),
        output_path: state.store().output_path(&output_name),
        options,
    };

    info!(
        filename = %saved.name,
        size_bytes = saved.size_bytes,
        job = %token,
        "Upload accepted, starting conversion"
    );

    spawn_job(
        Arc::clone(state.jobs()),
        Arc::clone(state.engine()),
        token,
        request,
    );

    Ok(Json(UploadResponse {
        message: "File uploaded and processing started".to_string(),
        filename: saved.name,
    }))
}

/// Returns the current job record.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<JobRecord> {
    Json(state.jobs().snapshot())
}

/// Lists completed audiobooks.
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<JobRow>>, ApiError> {
    let outputs = state.store().list_outputs().await.map_err(|e| {
        warn!(error = %e, "Failed to list outputs");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to list completed jobs")),
        )
    })?;

    let rows = outputs
        .into_iter()
        .map(|entry| JobRow {
            filename: entry.name,
            size: entry.size_bytes,
            created: entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(rows))
}
