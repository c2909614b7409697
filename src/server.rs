//! Server initialization and routing
//!
//! Axum setup: the router with every endpoint, the middleware stack, and
//! graceful shutdown handling.

use crate::config::AppConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{answers, ask, chat, health};
use crate::routes::{api_info, method_not_allowed, not_found};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware.
///
/// The question routes are POST-only; every other method on those paths
/// falls through to the 405 handler before any body parsing happens.
/// Public also so integration tests can drive the router directly.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .route("/api/chat", post(chat::chat).fallback(method_not_allowed))
        .route("/api/ask", post(ask::ask).fallback(method_not_allowed))
        .route(
            "/api/answers",
            post(answers::answers).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(state.config.timeout_secs),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// Initializes structured logging, builds shared state (clients, pipeline,
/// preloaded corpus), binds the listener, and serves until SIGTERM or
/// Ctrl+C.
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_target(false)
        .json()
        .init();

    let state = Arc::new(AppState::new(config.clone())?);
    let app = build_router(state);

    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting neurogen server on {} (timeout: {}s, max body: {}MB)",
        addr,
        config.timeout_secs,
        config.max_body_size_mb
    );
    tracing::info!(
        "RAG: top_k={}, chat_model={}, embedding_model={}",
        config.rag.top_k,
        config.rag.chat_model,
        config.rag.embedding_model
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
