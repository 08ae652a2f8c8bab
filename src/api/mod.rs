pub mod files;

use axum::Router;

use crate::config::CONFIG;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new().nest("/api", api_routes(state))
}

/// API routes under /api/*
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", axum::routing::get(service_info))
        .route("/health", axum::routing::get(health_check))
        .route("/system/health", axum::routing::get(health_check))
        .route("/system/version", axum::routing::get(get_version))
        .nest("/files", files::files_routes(state))
}

/// Service info endpoint
async fn service_info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": CONFIG.name,
        "version": CONFIG.version,
        "status": "operational",
        "message": "Welcome to the PDM Backend API"
    }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": CONFIG.name,
        "version": CONFIG.version,
        "debug": CONFIG.debug,
        "backend": "rust"
    }))
}
