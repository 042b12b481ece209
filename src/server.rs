//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::models::AppConfig;
use crate::services::{Ffmpeg, VideoPipeline};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<VideoPipeline>,
}

/// Create application state from a configuration.
pub fn create_app_state(config: Arc<AppConfig>) -> AppState {
    let pipeline = Arc::new(VideoPipeline::new(config.clone(), Ffmpeg::new()));
    AppState { config, pipeline }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. The body
/// limit covers whole multipart uploads, so it is sized from the
/// configured per-request maximum rather than axum's 2 MB default.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/api/process", post(api::handle_process))
        .route("/api/download/:filename", get(api::handle_download))
        .route("/api/palettes", get(api::handle_palettes))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
