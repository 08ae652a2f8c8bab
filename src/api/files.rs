use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::schemas::{
    ActionResponse, FileCheckinRequest, FileCheckoutRequest, FileInfo, FileListQuery,
    FileListResponse,
};
use crate::state::AppState;

/// Create file routes
pub fn files_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_files))
        .route("/checkout", post(checkout_file))
        .route("/checkin", post(checkin_file))
        .route("/:filename", get(get_file))
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List part files with lock status
async fn list_files(
    State(state): State<AppState>,
    query: std::result::Result<Query<FileListQuery>, QueryRejection>,
) -> Result<Json<FileListResponse>> {
    let Query(query) = query?;
    let files = state.files.clone();
    let response = tokio::task::spawn_blocking(move || files.list(&query)).await??;
    Ok(Json(response))
}

/// Get a single part file
async fn get_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<FileInfo>> {
    let files = state.files.clone();
    let info = tokio::task::spawn_blocking(move || files.get(&filename)).await??;
    Ok(Json(info))
}

/// Check a file out for editing
async fn checkout_file(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FileCheckoutRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>> {
    let Json(request) = payload?;
    let files = state.files.clone();
    let response = tokio::task::spawn_blocking(move || files.checkout(&request)).await??;
    Ok(Json(response))
}

/// Check a file back in
async fn checkin_file(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FileCheckinRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>> {
    let Json(request) = payload?;
    let files = state.files.clone();
    let response = tokio::task::spawn_blocking(move || files.checkin(&request)).await??;
    Ok(Json(response))
}
