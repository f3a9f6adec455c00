//! Production implementation of [`FileSystem`] backed by `std::fs`.

use crate::errors::{Error, Result};
use crate::io::traits::FileSystem;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Production file system implementation.
#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl RealFileSystem {
    /// Create a new real file system instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| Error::file_system("Failed to read file", path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).map_err(|e| Error::file_system("Failed to write file", path, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        match fs::create_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(e) => Err(Error::file_system("Failed to create directory", path, e)),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path)
            .map_err(|e| Error::file_system("Failed to remove directory", path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
