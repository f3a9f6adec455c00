// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod io;
pub mod observability;
pub mod relocator;
pub mod resolver;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use crate::errors::{CollidingPair, Error, Result};

pub use crate::resolver::{
    EntryPoint, ModuleRecord, Resolution, ResolveOptions, Resolver, Scope, SearchPath,
};

pub use crate::relocator::{
    relocate, CopiedModule, PackageLayout, RelocateOptions, RelocationPlan, RelocationReport,
    RenameMap,
};

pub use crate::scanner::{ImportScanner, ModuleFinder, ScannedModule};

pub use crate::utils::{detect_duplicates, zip_equal};
