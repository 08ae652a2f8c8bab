//! Request and response shapes for the `/api/files` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Available,
    CheckedOut,
}

/// A single part file in the repository, as sent to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub status: FileStatus,
    pub size_bytes: u64,
    pub locked_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_message: Option<String>,
}

/// Response for `GET /api/files`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<FileInfo>,
    pub total: usize,
}

/// Outcome of a checkout or checkin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Available,
    CheckedOut,
}

impl StatusFilter {
    pub fn matches(self, status: FileStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Available => status == FileStatus::Available,
            StatusFilter::CheckedOut => status == FileStatus::CheckedOut,
        }
    }
}

/// Query parameters for `GET /api/files`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileListQuery {
    /// Case-insensitive substring match on the filename
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FileCheckoutRequest {
    #[validate(length(min = 1))]
    pub filename: String,
    #[validate(length(min = 3))]
    pub user: String,
    #[validate(length(min = 1, max = 500))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FileCheckinRequest {
    #[validate(length(min = 1))]
    pub filename: String,
    #[validate(length(min = 1))]
    pub user: String,
}
