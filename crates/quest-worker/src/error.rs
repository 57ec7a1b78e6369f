//! Error types for the guard worker.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures that escape a handler. Every one becomes the generic 500
/// envelope; nothing propagates out of the router.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The upstream call failed without an HTTP response.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream claimed JSON but the body did not parse.
    #[error("upstream returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "worker exception");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "ok": false,
                "error": "Worker exception",
                "detail": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// Result type for worker operations.
pub type WorkerResult<T> = Result<T, WorkerError>;
