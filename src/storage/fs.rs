//! Narrow filesystem collaborator
//!
//! The core needs exactly three things from the filesystem: list a
//! directory's direct children, check whether a single path exists, and
//! resolve a path to a real directory. [`FileSystem`] captures that surface
//! so tests can substitute a fake; [`OsFileSystem`] is the `std::fs`
//! implementation used everywhere else.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("filesystem error under '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What the core requires from the filesystem layer. Listing order is not
/// relied upon; callers sort.
pub trait FileSystem {
    /// Names of the directory's direct children. Entries whose names are
    /// not valid UTF-8 are skipped; they cannot match a template anyway.
    fn list_children(&self, dir: &Path) -> Result<Vec<String>, DirectoryError>;

    fn exists(&self, path: &Path) -> bool;

    /// Canonicalizes `path`, failing if it is missing or not a directory.
    fn resolve_real_dir(&self, path: &Path) -> Result<PathBuf, DirectoryError>;
}

/// The real filesystem.
#[derive(Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_children(&self, dir: &Path) -> Result<Vec<String>, DirectoryError> {
        let entries = fs::read_dir(dir).map_err(|source| DirectoryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DirectoryError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn resolve_real_dir(&self, path: &Path) -> Result<PathBuf, DirectoryError> {
        let canonical = fs::canonicalize(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                DirectoryError::NotFound(path.to_path_buf())
            } else {
                DirectoryError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        if !canonical.is_dir() {
            return Err(DirectoryError::NotADirectory(path.to_path_buf()));
        }
        Ok(canonical)
    }
}
