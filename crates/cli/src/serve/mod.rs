//! `gstn serve` -- HTTP upload/download service for filing-status reports.
//!
//! Endpoints:
//! - GET  /health                    - Server status
//! - GET  /periods                   - Month and year options for the picker
//! - POST /fetch-taxpayer-details    - Multipart upload (month, year, file) -> report
//! - POST /download-file             - Download a report once, then delete it
//!
//! Error responses are JSON `{"error": ...}`.

mod handlers;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use self::handlers::{
    handle_download_file, handle_fetch_taxpayer_details, handle_health, handle_not_found,
    handle_periods,
};
use self::state::AppState;
use crate::config::Config;
use crate::runner::Pipeline;

/// Maximum request body size: 10 MB.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/periods", get(handle_periods))
        .route(
            "/fetch-taxpayer-details",
            post(handle_fetch_taxpayer_details),
        )
        .route("/download-file", post(handle_download_file))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server on `port` and run until Ctrl+C.
pub async fn start_server(port: u16, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::from_config(config);
    if config.remote_url().is_err() {
        tracing::warn!("no remote service URL configured; uploads will fail at lookup");
    }
    std::fs::create_dir_all(pipeline.export_dir())?;
    info!(export_dir = %pipeline.export_dir().display(), "reports are written here");

    let state = Arc::new(AppState::new(pipeline));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("gstn listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    eprintln!("\nReceived shutdown signal...");
}
