use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::ApiResult;
use crate::state::AppState;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME.elapsed().map(|d| d.as_secs()).unwrap_or(0)
}

/// Health check endpoint (liveness)
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "neurogen",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// Reports whether the optional corpus assets made it into memory; the
/// upstream services are not probed, each request finds out for itself.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let knowledge_base = if state.knowledge_base.is_some() {
        "loaded"
    } else {
        "not configured"
    };
    let documents = if state.documents.is_some() {
        "loaded"
    } else {
        "not configured"
    };

    Ok(Json(json!({
        "status": "ready",
        "service": "neurogen",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "knowledge_base": knowledge_base,
            "documents": documents,
        }
    })))
}

/// Basic metrics endpoint
pub async fn metrics() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "uptime_seconds": uptime_seconds(),
    })))
}
