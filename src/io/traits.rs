//! I/O trait definitions for relocation.
//!
//! The relocator only touches the disk through [`FileSystem`], which keeps
//! the planning logic free of side effects and lets the destination tree be
//! written by something other than `std::fs` when needed.

use crate::errors::Result;
use std::path::Path;

/// File system operations used while copying modules.
pub trait FileSystem {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileSystem` if the file doesn't exist, permission is
    /// denied, or the contents aren't valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write content to a file, creating or truncating it.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Create a directory and its parents. An already existing directory
    /// is not an error.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Recursively delete a directory tree.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Check if a path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;
}
