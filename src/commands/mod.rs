//! CLI command implementations.
//!
//! Available commands:
//! - **relocate**: copy entry modules and their dependencies into a new package
//! - **deps**: list the resolved dependency set without copying
//! - **init**: write a starter `.modreloc.toml`
//!
//! Settings are merged in one place: command-line values win over the
//! configuration file, which wins over built-in defaults.

pub mod deps;
pub mod init;
pub mod output;
pub mod relocate;

pub use deps::{list_dependencies, DepsConfig};
pub use init::init_config;
pub use relocate::{run_relocate, RelocateConfig};

use crate::cli::ResolveArgs;
use crate::config::{self, ModrelocConfig};
use crate::resolver::{EntryPoint, ResolveOptions, Resolver, SearchPath};
use anyhow::{Context, Result};
use std::path::Path;

/// Load the explicitly given config file, or discover the nearest one.
pub fn load_settings(explicit: Option<&Path>) -> Result<ModrelocConfig> {
    match explicit {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(config::load_config()),
    }
}

/// Resolve options with command-line values taking precedence over the file.
pub fn merge_resolve_options(args: &ResolveArgs, file: &ModrelocConfig) -> ResolveOptions {
    ResolveOptions {
        scope: args.scope.or(file.resolve.scope).unwrap_or_default(),
        project_root_pattern: args
            .project_root_pattern
            .clone()
            .or_else(|| file.resolve.project_root_pattern.clone()),
        drop_package_init_files: args.drop_package_init_files
            || file.resolve.drop_package_init_files.unwrap_or(false),
    }
}

/// Resolver over `-I` roots, then config roots, then PYTHONPATH and the
/// current directory.
pub fn build_resolver(args: &ResolveArgs, file: &ModrelocConfig) -> Resolver {
    let roots: Vec<_> = args
        .search_paths
        .iter()
        .chain(file.search_paths.iter())
        .cloned()
        .collect();
    Resolver::new(SearchPath::from_env(&roots))
}

pub fn parse_entry_points(args: &ResolveArgs) -> Vec<EntryPoint> {
    args.entries.iter().map(|arg| EntryPoint::parse(arg)).collect()
}
