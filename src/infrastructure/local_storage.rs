//! Filesystem storage for batch files.
//!
//! Each resource key is a file name inside the storage root. The root is
//! created lazily on the first write.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::domain::{AppError, Result};

use super::storage::BatchStorage;

/// Local storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Creates storage rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .map_err(|e| AppError::io("Failed to create storage directory", e))
    }
}

impl BatchStorage for LocalStorage {
    fn len(&self, key: &str) -> Result<Option<u64>> {
        let path = self.path(key);
        match fs::metadata(&path) {
            Ok(metadata) => Ok(Some(metadata.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::io(
                format!("Failed to stat {}", path.display()),
                e,
            )),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_root()?;
        let path = self.path(key);
        fs::write(&path, bytes)
            .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))
    }

    fn append(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_root()?;
        let path = self.path(key);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AppError::io(format!("Failed to open {}", path.display()), e))?;
        file.write_all(bytes)
            .map_err(|e| AppError::io(format!("Failed to append to {}", path.display()), e))
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::io(
                format!("Failed to read {}", path.display()),
                e,
            )),
        }
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::io(
                format!("Failed to delete {}", path.display()),
                e,
            )),
        }
    }

    fn describe(&self, key: &str) -> String {
        self.path(key).display().to_string()
    }
}
