//! Exclusive file locking for read-modify-write cycles.
//!
//! [`LockedFile`] takes an OS-level exclusive lock (`flock` on Unix,
//! `LockFileEx` on Windows) as soon as the file is opened and holds it until
//! the value is dropped. Other processes, and other handles in this process,
//! block until the lock is released.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// An open file holding an exclusive lock for its whole lifetime
#[derive(Debug)]
pub struct LockedFile {
    file: File,
    path: PathBuf,
}

impl LockedFile {
    /// Open an existing file and block until the exclusive lock is acquired
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open_with(path.as_ref(), false)
    }

    /// Like [`LockedFile::open`], creating the file (empty) if it is missing
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open_with(path.as_ref(), true)
    }

    fn open_with(path: &Path, create: bool) -> io::Result<Self> {
        // Never truncate on open: truncation must happen under the lock
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(create)
            .truncate(false)
            .open(path)?;

        file.lock().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Could not acquire lock on {}: {}", path.display(), e),
            )
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file from the start
    pub fn read_all(&mut self) -> io::Result<String> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        self.file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Replace the file contents: seek to start, truncate, write, flush
    pub fn replace_contents(&mut self, contents: &str) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        self.file.write_all(contents.as_bytes())?;
        self.file.flush()?;
        self.file.sync_data()
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release lock on {}: {}", self.path.display(), e);
        }
    }
}
