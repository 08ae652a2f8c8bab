use std::path::Path;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::api;
use crate::config::Config;
use crate::state::AppState;

/// Create the main application router
pub fn create_app(state: AppState, config: &Config) -> Router {
    let api_router = api::create_router(state);

    // Static file serving (frontend), falling back to index.html
    let static_service = ServeDir::new(&config.static_files_dir)
        .fallback(ServeFile::new(config.static_files_dir.join("index.html")));

    Router::new()
        .merge(api_router)
        .fallback_service(static_service)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
}

/// CORS layer for the configured origins; an empty list allows any origin
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Whether the static frontend has an entry point
pub fn has_frontend(static_files_dir: &Path) -> bool {
    static_files_dir.join("index.html").is_file()
}
