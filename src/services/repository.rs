use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Invalid filename: {0}")]
    InvalidName(String),

    #[error("File '{0}' not found")]
    NotFound(String),

    #[error("Repository IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RepoResult<T> = std::result::Result<T, RepoError>;

/// A part file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartFile {
    pub name: String,
    pub size_bytes: u64,
}

/// Flat directory of part files
#[derive(Debug, Clone)]
pub struct FileRepository {
    repo_path: PathBuf,
}

impl FileRepository {
    /// Open the repository, creating the directory if needed
    pub fn new(repo_path: impl Into<PathBuf>) -> RepoResult<Self> {
        let repo_path = repo_path.into();
        std::fs::create_dir_all(&repo_path)?;
        Ok(Self { repo_path })
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// List regular, non-hidden files sorted by name
    pub fn list_files(&self) -> RepoResult<Vec<PartFile>> {
        let mut files: Vec<PartFile> = std::fs::read_dir(&self.repo_path)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('.') {
                    return None;
                }

                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }

                Some(PartFile {
                    name,
                    size_bytes: metadata.len(),
                })
            })
            .collect();

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Look up a single file by bare name
    pub fn file_metadata(&self, name: &str) -> RepoResult<PartFile> {
        let path = self.resolve(name)?;

        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => Ok(PartFile {
                name: name.to_string(),
                size_bytes: metadata.len(),
            }),
            Ok(_) => Err(RepoError::NotFound(name.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RepoError::NotFound(name.to_string()))
            }
            Err(e) => Err(RepoError::Io(e)),
        }
    }

    /// Map a filename to its path inside the repository.
    ///
    /// Only a single normal path component is accepted, so separators,
    /// `..` and absolute paths can never escape the repository root.
    pub fn resolve(&self, name: &str) -> RepoResult<PathBuf> {
        validate_name(name)?;
        Ok(self.repo_path.join(name))
    }
}

fn validate_name(name: &str) -> RepoResult<()> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(RepoError::InvalidName(name.to_string()));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(RepoError::InvalidName(name.to_string())),
    }
}
