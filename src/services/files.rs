//! Check-out/check-in business logic.
//!
//! Combines the on-disk [`FileRepository`] with the [`LockManager`] to
//! produce the views the API returns. All methods block on filesystem I/O and
//! the lock file, so async callers should run them on a blocking thread.

use validator::Validate;

use super::locks::{LockInfo, LockManager, LockMap};
use super::repository::{FileRepository, PartFile};
use crate::error::Result;
use crate::schemas::{
    ActionResponse, FileCheckinRequest, FileCheckoutRequest, FileInfo, FileListQuery,
    FileListResponse, FileStatus,
};

#[derive(Debug, Clone)]
pub struct FileService {
    repository: FileRepository,
    locks: LockManager,
}

impl FileService {
    pub fn new(repository: FileRepository, locks: LockManager) -> Self {
        Self { repository, locks }
    }

    pub fn repository(&self) -> &FileRepository {
        &self.repository
    }

    pub fn locks(&self) -> &LockManager {
        &self.locks
    }

    /// List files with their lock status, filtered by the query
    pub fn list(&self, query: &FileListQuery) -> Result<FileListResponse> {
        let locks = self.locks.load_locks();
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let files: Vec<FileInfo> = self
            .repository
            .list_files()?
            .into_iter()
            .filter(|file| match &search {
                Some(needle) => file.name.to_lowercase().contains(needle),
                None => true,
            })
            .map(|file| file_info(file, &locks))
            .filter(|info| query.status.matches(info.status))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        let total = files.len();
        Ok(FileListResponse { files, total })
    }

    /// Get a single file with its lock status
    pub fn get(&self, filename: &str) -> Result<FileInfo> {
        let file = self.repository.file_metadata(filename)?;
        Ok(file_info(file, &self.locks.load_locks()))
    }

    /// Check a file out, locking it for the requesting user
    pub fn checkout(&self, request: &FileCheckoutRequest) -> Result<ActionResponse> {
        request.validate()?;
        self.repository.file_metadata(&request.filename)?;

        self.locks
            .acquire_lock(&request.filename, &request.user, &request.message)?;

        Ok(ActionResponse {
            success: true,
            message: format!(
                "User '{}' checked out '{}'",
                request.user, request.filename
            ),
        })
    }

    /// Check a file back in, releasing the user's lock
    pub fn checkin(&self, request: &FileCheckinRequest) -> Result<ActionResponse> {
        request.validate()?;
        self.repository.resolve(&request.filename)?;

        if !self.locks.is_locked(&request.filename) {
            // Distinguish "no such file" from "file exists but is not checked out"
            self.repository.file_metadata(&request.filename)?;
        }

        self.locks.release_lock(&request.filename, &request.user)?;

        Ok(ActionResponse {
            success: true,
            message: format!(
                "User '{}' checked in '{}'",
                request.user, request.filename
            ),
        })
    }
}

fn file_info(file: PartFile, locks: &LockMap) -> FileInfo {
    match locks.get(&file.name) {
        Some(LockInfo {
            user,
            timestamp,
            message,
        }) => FileInfo {
            name: file.name,
            status: FileStatus::CheckedOut,
            size_bytes: file.size_bytes,
            locked_by: Some(user.clone()),
            locked_at: Some(*timestamp),
            lock_message: Some(message.clone()),
        },
        None => FileInfo {
            name: file.name,
            status: FileStatus::Available,
            size_bytes: file.size_bytes,
            locked_by: None,
            locked_at: None,
            lock_message: None,
        },
    }
}
