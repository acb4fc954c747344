use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{files, handlers, jobs};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let max_upload = state.config().storage.max_upload_bytes as usize;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/upload", post(jobs::upload))
        .route("/status", get(jobs::status))
        .route("/jobs", get(jobs::list_jobs))
        .route("/download/{filename}", get(files::download))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use bookvox_core::{
        ArtifactStore, Config, ConversionEngine, EngineConfig, JobTracker, SimulatedEngine,
        StorageConfig,
    };

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    fn fast_engine_config() -> EngineConfig {
        EngineConfig {
            analysis_step_ms: 1,
            synthesis_step_ms: 1,
            finalize_ms: 1,
            available: true,
        }
    }

    async fn test_app(engine_config: EngineConfig) -> (Router, Arc<AppState>, TempDir) {
        let temp = TempDir::new().unwrap();
        let upload_dir = temp.path().join("uploads");
        let output_dir = temp.path().join("outputs");

        let config = Config {
            storage: StorageConfig {
                upload_dir: upload_dir.clone(),
                output_dir: output_dir.clone(),
                max_upload_bytes: 1024 * 1024,
            },
            engine: engine_config.clone(),
            ..Config::default()
        };

        let store = ArtifactStore::new(upload_dir, output_dir);
        store.ensure_dirs().await.unwrap();

        let engine: Arc<dyn ConversionEngine> = Arc::new(SimulatedEngine::new(engine_config));
        let state = Arc::new(AppState::new(
            config,
            store,
            engine,
            Arc::new(JobTracker::new()),
        ));

        (create_router(Arc::clone(&state)), state, temp)
    }

    fn multipart_upload(filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                boundary = BOUNDARY,
                filename = filename,
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get(app: &Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Polls /status until the given status value appears or the timeout
    /// elapses; returns the last observed record.
    async fn poll_status_until(app: &Router, wanted: &str) -> serde_json::Value {
        let mut last = serde_json::Value::Null;
        for _ in 0..250 {
            let response = get(app, "/status").await;
            last = json_body(response).await;
            if last["status"] == wanted {
                return last;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        last
    }

    #[tokio::test]
    async fn test_health_reports_engine_availability() {
        let (app, _state, _temp) = test_app(fast_engine_config()).await;

        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["analysis_available"], true);
    }

    #[tokio::test]
    async fn test_index_renders_idle_record() {
        let (app, _state, _temp) = test_app(fast_engine_config()).await;

        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("idle"));
        assert!(html.contains("Ready to process books"));
    }

    #[tokio::test]
    async fn test_upload_runs_to_completion_and_download_round_trips() {
        let (app, _state, temp) = test_app(fast_engine_config()).await;

        let response = app
            .clone()
            .oneshot(multipart_upload("book.epub", b"the book"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["message"], "File uploaded and processing started");
        assert_eq!(json["filename"], "book.epub");

        // The upload landed inside the uploads area
        assert!(temp.path().join("uploads/book.epub").exists());

        let record = poll_status_until(&app, "completed").await;
        assert_eq!(record["status"], "completed");
        assert_eq!(record["progress"], 100);
        assert_eq!(record["output_file"], "book_audiobook.m4b");
        assert!(record["start_time"].is_string());

        // Download returns the exact bytes the worker wrote
        let expected = tokio::fs::read(temp.path().join("outputs/book_audiobook.m4b"))
            .await
            .unwrap();
        let response = get(&app, "/download/book_audiobook.m4b").await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.to_vec(), expected);

        // The completed run shows up in the jobs listing
        let response = get(&app, "/jobs").await;
        let rows = json_body(response).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["filename"], "book_audiobook.m4b");
        assert_eq!(rows[0]["size"], expected.len() as u64);
    }

    #[tokio::test]
    async fn test_status_progress_is_non_decreasing() {
        let (app, _state, _temp) = test_app(EngineConfig {
            analysis_step_ms: 10,
            synthesis_step_ms: 10,
            finalize_ms: 10,
            available: true,
        })
        .await;

        let response = app
            .clone()
            .oneshot(multipart_upload("book.epub", b"content"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut last = 0u64;
        let mut completed = false;
        for _ in 0..500 {
            let record = json_body(get(&app, "/status").await).await;
            let progress = record["progress"].as_u64().unwrap();
            assert!(progress >= last, "progress regressed: {} < {}", progress, last);
            last = progress;
            if record["status"] == "completed" {
                assert_eq!(progress, 100);
                completed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(completed, "job did not complete in time");
    }

    #[tokio::test]
    async fn test_second_upload_rejected_while_processing() {
        // Slow enough that the first job is still running
        let (app, _state, _temp) = test_app(EngineConfig {
            analysis_step_ms: 100,
            synthesis_step_ms: 100,
            finalize_ms: 100,
            available: true,
        })
        .await;

        let response = app
            .clone()
            .oneshot(multipart_upload("first.epub", b"one"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(multipart_upload("second.epub", b"two"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Another job is already running");

        // The in-flight job is untouched
        let record = json_body(get(&app, "/status").await).await;
        assert_eq!(record["status"], "processing");
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_extension() {
        let (app, state, _temp) = test_app(fast_engine_config()).await;

        let response = app
            .clone()
            .oneshot(multipart_upload("book.exe", b"malware"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "File type not allowed");

        // Rejected before any worker starts
        assert!(!state.jobs().is_busy());
        let record = json_body(get(&app, "/status").await).await;
        assert_eq!(record["status"], "idle");
    }

    #[tokio::test]
    async fn test_upload_without_file_part() {
        let (app, _state, _temp) = test_app(fast_engine_config()).await;

        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"tts_model\"\r\n\r\nxtts_v2\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_upload_with_empty_filename() {
        let (app, _state, _temp) = test_app(fast_engine_config()).await;

        let response = app
            .oneshot(multipart_upload("", b"content"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No file selected");
    }

    #[tokio::test]
    async fn test_upload_traversal_name_is_sanitized() {
        let (app, _state, temp) = test_app(fast_engine_config()).await;

        let response = app
            .clone()
            .oneshot(multipart_upload("../../evil.epub", b"payload"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["filename"], "evil.epub");

        assert!(temp.path().join("uploads/evil.epub").exists());
        assert!(!temp.path().join("evil.epub").exists());
    }

    #[tokio::test]
    async fn test_failed_job_does_not_lock_out_future_uploads() {
        // An unavailable engine fails every job immediately
        let (app, state, _temp) = test_app(EngineConfig {
            available: false,
            ..fast_engine_config()
        })
        .await;

        let response = app
            .clone()
            .oneshot(multipart_upload("book.epub", b"content"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let record = poll_status_until(&app, "error").await;
        assert_eq!(record["status"], "error");
        assert_eq!(record["progress"], 0);
        assert!(record["message"]
            .as_str()
            .unwrap()
            .contains("Processing failed"));
        assert!(record["output_file"].is_null());

        // Token was released; the next upload is accepted
        assert!(!state.jobs().is_busy());
        let response = app
            .clone()
            .oneshot(multipart_upload("retry.epub", b"content"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_download_unknown_file_is_404() {
        let (app, _state, _temp) = test_app(fast_engine_config()).await;

        let response = get(&app, "/download/nonexistent.m4b").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"], "File not found");
    }

    #[tokio::test]
    async fn test_jobs_lists_multiple_completed_runs() {
        let (app, _state, temp) = test_app(fast_engine_config()).await;

        for name in ["alpha.epub", "beta.epub"] {
            let response = app
                .clone()
                .oneshot(multipart_upload(name, b"content"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let record = poll_status_until(&app, "completed").await;
            assert_eq!(record["status"], "completed");
        }

        let response = get(&app, "/jobs").await;
        let rows = json_body(response).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 2);

        let mut names: Vec<&str> = rows
            .iter()
            .map(|r| r["filename"].as_str().unwrap())
            .collect();
        names.sort_unstable();
        assert_eq!(names, ["alpha_audiobook.m4b", "beta_audiobook.m4b"]);

        for row in rows {
            let on_disk = std::fs::metadata(
                temp.path()
                    .join("outputs")
                    .join(row["filename"].as_str().unwrap()),
            )
            .unwrap();
            assert_eq!(row["size"].as_u64().unwrap(), on_disk.len());
        }
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let (app, state, _temp) = test_app(fast_engine_config()).await;

        let too_big = vec![0u8; 2 * 1024 * 1024]; // limit is 1 MiB
        let response = app
            .clone()
            .oneshot(multipart_upload("big.epub", &too_big))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert!(!state.jobs().is_busy());
    }
}
