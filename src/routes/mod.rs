//! API route handlers
//!
//! - `chat`: retrieval-augmented question answering
//! - `ask`: flat knowledge-base prompt, no retrieval round-trip
//! - `answers`: legacy hosted answers endpoint, retrieval done server-side
//! - `health`: liveness, readiness, and metrics
//!
//! All three question routes are POST-only and share the same request body
//! and error surface: missing or empty `question` is a 400, any other
//! method on the path is a 405, and an upstream failure is a 500 carrying
//! the upstream message.

pub mod answers;
pub mod ask;
pub mod chat;
pub mod health;

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::{ApiError, ApiResult};

/// Common request body for every question route.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    /// The user question. Required; rejected when absent or empty.
    #[serde(default)]
    pub question: String,
}

/// API version and base info (GET /)
pub async fn api_info() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Neurogen Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/chat",
            "/api/ask",
            "/api/answers",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler for undefined routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// 405 handler for non-POST methods on the question routes.
///
/// Registered as the method fallback so it fires before any body parsing.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
