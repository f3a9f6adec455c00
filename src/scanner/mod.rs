//! Static import scanning.
//!
//! [`ImportScanner`] is the seam between the resolver and whatever walks the
//! import graph. The default implementation, [`ModuleFinder`], parses each
//! reachable Python file with tree-sitter and follows its imports over a
//! [`SearchPath`](crate::resolver::SearchPath).

pub mod finder;
pub mod python;

pub use finder::ModuleFinder;
pub use python::{extract_imports, ImportStatement};

use crate::errors::Result;
use crate::resolver::SearchPath;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A module reached while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedModule {
    pub name: String,
    /// Python source file; `None` for compiled extensions, bytecode-only
    /// modules and namespace packages
    pub file: Option<PathBuf>,
    pub is_package: bool,
}

/// Discovers the modules a script transitively imports.
pub trait ImportScanner {
    /// Scan `script`, treated as module `module_name`, and return every
    /// module it transitively imports keyed by dotted name. The script itself
    /// only appears in the result when something it imports imports it back.
    fn scan(
        &self,
        script: &Path,
        module_name: &str,
        search_path: &SearchPath,
    ) -> Result<BTreeMap<String, ScannedModule>>;
}
