//! Lock state for checked-out part files.
//!
//! Locks live in a single JSON object on disk mapping filename to
//! [`LockInfo`]. Every mutation runs as one read-modify-write while holding
//! the OS lock on that file, so concurrent requests (or processes) cannot
//! both acquire the same part.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::locked_file::LockedFile;

/// Filename -> lock holder
pub type LockMap = BTreeMap<String, LockInfo>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum LockError {
    #[error("File already locked by {user}")]
    AlreadyLocked { user: String },

    #[error("File is not locked")]
    NotLocked,

    #[error("Lock owned by {owner}, not {user}")]
    WrongOwner { owner: String, user: String },

    #[error("Lock file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lock file JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LockResult<T> = std::result::Result<T, LockError>;

/// Manages file lock state stored in a JSON file
#[derive(Debug, Clone)]
pub struct LockManager {
    locks_file: PathBuf,
}

impl LockManager {
    /// Create a manager, writing an empty lock table if the file is missing
    pub fn new(locks_file: impl Into<PathBuf>) -> LockResult<Self> {
        let locks_file = locks_file.into();

        if let Some(parent) = locks_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = LockedFile::create(&locks_file)?;
        if file.read_all()?.trim().is_empty() {
            file.replace_contents("{}")?;
        }

        Ok(Self { locks_file })
    }

    pub fn locks_file(&self) -> &Path {
        &self.locks_file
    }

    /// Load current lock state.
    ///
    /// A missing, empty or corrupt lock file reads as "no locks"; the
    /// failure is logged rather than returned.
    pub fn load_locks(&self) -> LockMap {
        if !self.locks_file.exists() {
            return LockMap::new();
        }

        match LockedFile::open(&self.locks_file) {
            Ok(mut file) => match file.read_all() {
                Ok(contents) => parse_locks(&contents),
                Err(e) => {
                    tracing::error!("Failed to load locks: {}", e);
                    LockMap::new()
                }
            },
            Err(e) => {
                tracing::error!("Failed to load locks: {}", e);
                LockMap::new()
            }
        }
    }

    /// Replace the whole lock table
    pub fn save_locks(&self, locks: &LockMap) -> LockResult<()> {
        let mut file = LockedFile::create(&self.locks_file)?;
        write_locks(&mut file, locks).map_err(|e| {
            tracing::error!("Failed to save locks: {}", e);
            e
        })
    }

    pub fn is_locked(&self, filename: &str) -> bool {
        self.load_locks().contains_key(filename)
    }

    pub fn get_lock_info(&self, filename: &str) -> Option<LockInfo> {
        self.load_locks().remove(filename)
    }

    /// Acquire the lock on `filename` for `user`
    pub fn acquire_lock(&self, filename: &str, user: &str, message: &str) -> LockResult<LockInfo> {
        let info = self.update(|locks| {
            if let Some(existing) = locks.get(filename) {
                return Err(LockError::AlreadyLocked {
                    user: existing.user.clone(),
                });
            }

            let info = LockInfo {
                user: user.to_string(),
                timestamp: Utc::now(),
                message: message.to_string(),
            };
            locks.insert(filename.to_string(), info.clone());
            Ok(info)
        })?;

        tracing::info!("Lock acquired: {} by {}", filename, user);
        Ok(info)
    }

    /// Release the lock on `filename`; only the owner may release it
    pub fn release_lock(&self, filename: &str, user: &str) -> LockResult<LockInfo> {
        let released = self.update(|locks| {
            let owner = match locks.get(filename) {
                Some(existing) => existing.user.clone(),
                None => return Err(LockError::NotLocked),
            };

            if owner != user {
                return Err(LockError::WrongOwner {
                    owner,
                    user: user.to_string(),
                });
            }

            locks.remove(filename).ok_or(LockError::NotLocked)
        })?;

        tracing::info!("Lock released: {} by {}", filename, user);
        Ok(released)
    }

    /// Run `f` against the lock table while holding the file lock, persisting
    /// the table only when `f` succeeds.
    ///
    /// An unparseable table is an error here: writing back an empty map
    /// would drop every other user's lock.
    fn update<T>(&self, f: impl FnOnce(&mut LockMap) -> LockResult<T>) -> LockResult<T> {
        let mut file = LockedFile::create(&self.locks_file)?;
        let mut locks = try_parse_locks(&file.read_all()?).map_err(|e| {
            tracing::error!("Refusing to modify unreadable locks file: {}", e);
            e
        })?;
        let result = f(&mut locks)?;
        write_locks(&mut file, &locks)?;
        Ok(result)
    }
}

fn try_parse_locks(contents: &str) -> LockResult<LockMap> {
    if contents.trim().is_empty() {
        return Ok(LockMap::new());
    }
    Ok(serde_json::from_str(contents)?)
}

fn parse_locks(contents: &str) -> LockMap {
    try_parse_locks(contents).unwrap_or_else(|e| {
        tracing::error!("Failed to parse locks file: {}", e);
        LockMap::new()
    })
}

fn write_locks(file: &mut LockedFile, locks: &LockMap) -> LockResult<()> {
    let json = serde_json::to_string_pretty(locks)?;
    file.replace_contents(&json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn manager() -> (tempfile::TempDir, LockManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path().join("locks.json")).unwrap();
        (dir, manager)
    }

    #[test]
    fn test_new_creates_empty_lock_file() {
        let (_dir, manager) = manager();
        let contents = std::fs::read_to_string(manager.locks_file()).unwrap();
        assert_eq!(contents, "{}");
        assert!(manager.load_locks().is_empty());
    }

    #[test]
    fn test_new_preserves_existing_locks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locks.json");
        std::fs::write(
            &path,
            r#"{"a.mcam":{"user":"alice","timestamp":"2025-01-01T00:00:00Z","message":"edit"}}"#,
        )
        .unwrap();

        let manager = LockManager::new(&path).unwrap();
        assert!(manager.is_locked("a.mcam"));
    }

    #[test]
    fn test_new_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("locks.json");
        let manager = LockManager::new(&path).unwrap();
        assert!(manager.locks_file().exists());
    }

    #[test]
    fn test_acquire_and_get_lock_info() {
        let (_dir, manager) = manager();

        let info = manager
            .acquire_lock("4806148.mcam", "mmclean", "Fixing toolpath")
            .unwrap();
        assert_eq!(info.user, "mmclean");

        assert!(manager.is_locked("4806148.mcam"));
        let stored = manager.get_lock_info("4806148.mcam").unwrap();
        assert_eq!(stored, info);
        assert_eq!(stored.message, "Fixing toolpath");
    }

    #[test]
    fn test_acquire_twice_reports_holder() {
        let (_dir, manager) = manager();
        manager.acquire_lock("a.mcam", "alice", "first").unwrap();

        let err = manager.acquire_lock("a.mcam", "bob", "second").unwrap_err();
        assert!(matches!(err, LockError::AlreadyLocked { ref user } if user == "alice"));
        assert_eq!(err.to_string(), "File already locked by alice");
    }

    #[test]
    fn test_release_by_owner() {
        let (_dir, manager) = manager();
        manager.acquire_lock("a.mcam", "alice", "edit").unwrap();

        manager.release_lock("a.mcam", "alice").unwrap();
        assert!(!manager.is_locked("a.mcam"));
        assert!(manager.get_lock_info("a.mcam").is_none());
    }

    #[test]
    fn test_release_unlocked_file() {
        let (_dir, manager) = manager();
        let err = manager.release_lock("a.mcam", "alice").unwrap_err();
        assert!(matches!(err, LockError::NotLocked));
    }

    #[test]
    fn test_release_by_other_user_keeps_lock() {
        let (_dir, manager) = manager();
        manager.acquire_lock("a.mcam", "alice", "edit").unwrap();

        let err = manager.release_lock("a.mcam", "bob").unwrap_err();
        assert_eq!(err.to_string(), "Lock owned by alice, not bob");
        assert!(manager.is_locked("a.mcam"));
    }

    #[test]
    fn test_corrupt_lock_file_reads_as_empty() {
        let (_dir, manager) = manager();
        std::fs::write(manager.locks_file(), "{not json").unwrap();
        assert!(manager.load_locks().is_empty());
    }

    #[test]
    fn test_corrupt_lock_file_is_not_overwritten() {
        let (_dir, manager) = manager();
        let contents = r#"{
            "a.mcam": {"user": "alice", "timestamp": "2025-01-01T00:00:00Z", "message": "edit"},
            "c.mcam": {"user": "carol", "timestamp": "yesterday", "message": "rework"}
        }"#;
        std::fs::write(manager.locks_file(), contents).unwrap();

        let err = manager.acquire_lock("b.mcam", "bob", "new").unwrap_err();
        assert!(matches!(err, LockError::Json(_)));
        let err = manager.release_lock("a.mcam", "alice").unwrap_err();
        assert!(matches!(err, LockError::Json(_)));

        assert_eq!(
            std::fs::read_to_string(manager.locks_file()).unwrap(),
            contents
        );
    }

    #[test]
    fn test_missing_lock_file_reads_as_empty() {
        let (_dir, manager) = manager();
        std::fs::remove_file(manager.locks_file()).unwrap();
        assert!(manager.load_locks().is_empty());
        assert!(!manager.is_locked("a.mcam"));
    }

    #[test]
    fn test_save_locks_round_trips() {
        let (_dir, manager) = manager();
        let mut locks = LockMap::new();
        locks.insert(
            "b.mcam".to_string(),
            LockInfo {
                user: "carol".to_string(),
                timestamp: Utc::now(),
                message: "rework".to_string(),
            },
        );

        manager.save_locks(&locks).unwrap();
        assert_eq!(manager.load_locks(), locks);
    }

    #[test]
    fn test_parallel_acquire_single_winner() {
        let (_dir, manager) = manager();
        let manager = Arc::new(manager);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    manager
                        .acquire_lock("contended.mcam", &format!("user{}", i), "race")
                        .is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
