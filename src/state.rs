use std::sync::Arc;

use crate::services::files::FileService;

/// Shared file service
pub type SharedFileService = Arc<FileService>;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub files: SharedFileService,
}

impl AppState {
    pub fn new(files: FileService) -> Self {
        Self {
            files: Arc::new(files),
        }
    }
}
