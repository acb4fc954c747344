pub mod files;
pub mod handlers;
pub mod jobs;
pub mod routes;

pub use routes::create_router;

use serde::Serialize;

/// Error response body shared by all handlers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
