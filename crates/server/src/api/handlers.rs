use axum::{extract::State, response::Html, Json};
use serde::Serialize;
use std::sync::Arc;

use bookvox_core::JobStatus;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub analysis_available: bool,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        analysis_available: state.engine().available(),
    })
}

/// Renders the current job record as a minimal status page.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let record = state.jobs().snapshot();

    let status_label = match record.status {
        JobStatus::Idle => "idle",
        JobStatus::Processing => "processing",
        JobStatus::Completed => "completed",
        JobStatus::Error => "error",
    };

    let download_row = match &record.output_file {
        Some(name) => format!(
            r#"<p><a href="/download/{name}">Download {name}</a></p>"#,
            name = name
        ),
        None => String::new(),
    };

    let body = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>bookvox</title></head>
<body>
<h1>bookvox</h1>
<p>Status: <strong>{status}</strong></p>
<p>Progress: {progress}%</p>
<p>{message}</p>
{download_row}
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="file" />
<input type="submit" value="Convert" />
</form>
</body>
</html>
"#,
        status = status_label,
        progress = record.progress,
        message = record.message,
        download_row = download_row,
    );

    Html(body)
}
