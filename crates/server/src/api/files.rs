//! Download handler for finished audiobooks.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::warn;

use bookvox_core::StoreError;

use super::ErrorResponse;
use crate::state::AppState;

/// Streams a finished audiobook as an attachment.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let (file, size) = state.store().open_output(&filename).await.map_err(|e| {
        match e {
            StoreError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("File not found")),
            ),
            other => {
                warn!(error = %other, filename = %filename, "Failed to open output");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to read file")),
                )
            }
        }
    })?;

    let stream = ReaderStream::new(file);

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_LENGTH, size.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
