//! Import graph resolution.
//!
//! Turns entry points into the scoped set of modules they depend on:
//!
//! 1. locate each entry module (dotted name on the search path, or a file
//!    whose package chain gives its dotted name)
//! 2. scan its transitive imports
//! 3. drop modules without a source file and force-include the entry itself
//! 4. apply the scope filter and, optionally, drop package initializers
//!
//! Each entry point is resolved independently and the results are unioned.
//! Nothing is cached between calls.

pub mod scope;
pub mod search_path;

pub use scope::{compile_pattern, Scope, ScopeFilter};
pub use search_path::{
    is_package_init, locate_defining_module, normalize_source_path, ModuleLocation, SearchPath,
};

use crate::errors::{Error, Result};
use crate::observability::{set_phase, RelocationPhase};
use crate::scanner::{ImportScanner, ModuleFinder};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

/// What to compute the dependency closure of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// Fully-qualified dotted module name, e.g. `pkg.sub.main`
    Module(String),
    /// Path to the module's `.py` (or `.pyc`) file
    File(PathBuf),
}

impl EntryPoint {
    /// Interpret a command-line argument: paths to existing files and
    /// arguments ending in `.py`/`.pyc` are files, anything else is a
    /// dotted name.
    pub fn parse(arg: &str) -> Self {
        let path = Path::new(arg);
        let looks_like_file = arg.ends_with(".py") || arg.ends_with(".pyc");
        if looks_like_file || path.is_file() {
            Self::File(path.to_path_buf())
        } else {
            Self::Module(arg.to_string())
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(name) => write!(f, "{}", name),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for EntryPoint {
    fn from(name: &str) -> Self {
        Self::Module(name.to_string())
    }
}

/// A module kept by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    pub name: String,
    /// Absolute source file path
    pub source: PathBuf,
    /// Whether this module is one of the requested entry points
    pub primary: bool,
}

impl ModuleRecord {
    /// Last dotted segment of the name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn is_package_init(&self) -> bool {
        is_package_init(&self.source)
    }
}

/// Resolver output: modules keyed by dotted name plus the entry names in
/// request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub modules: BTreeMap<String, ModuleRecord>,
    pub primary_names: Vec<String>,
}

impl Resolution {
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }

    pub fn is_primary(&self, name: &str) -> bool {
        self.primary_names.iter().any(|primary| primary == name)
    }
}

/// Options shared by every entry point of one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub scope: Scope,
    /// Case-insensitive regex searched in source paths; replaces the
    /// grandparent-directory rule of `Scope::Project`
    pub project_root_pattern: Option<String>,
    pub drop_package_init_files: bool,
}

/// Resolves entry points against a search path with a pluggable scanner.
#[derive(Debug, Clone)]
pub struct Resolver<S = ModuleFinder> {
    search_path: SearchPath,
    scanner: S,
}

impl Resolver<ModuleFinder> {
    pub fn new(search_path: SearchPath) -> Self {
        Self::with_scanner(search_path, ModuleFinder::new())
    }
}

impl<S: ImportScanner> Resolver<S> {
    pub fn with_scanner(search_path: SearchPath, scanner: S) -> Self {
        Self {
            search_path,
            scanner,
        }
    }

    /// Resolve every entry point and union the results.
    pub fn resolve(
        &self,
        entry_points: &[EntryPoint],
        options: &ResolveOptions,
    ) -> Result<Resolution> {
        if entry_points.is_empty() {
            return Err(Error::configuration("at least one entry point is required"));
        }

        let pattern = options
            .project_root_pattern
            .as_deref()
            .map(compile_pattern)
            .transpose()?;

        let mut files = BTreeMap::new();
        let mut primary_names = Vec::with_capacity(entry_points.len());
        for entry in entry_points {
            let (modules, name) = self.resolve_one(entry, options, pattern.as_ref())?;
            files.extend(modules);
            primary_names.push(name);
        }

        let modules = files
            .into_iter()
            .map(|(name, source)| {
                let primary = primary_names.contains(&name);
                (
                    name.clone(),
                    ModuleRecord {
                        name,
                        source,
                        primary,
                    },
                )
            })
            .collect();

        Ok(Resolution {
            modules,
            primary_names,
        })
    }

    /// Module files reachable from one entry point, and its dotted name.
    fn resolve_one(
        &self,
        entry: &EntryPoint,
        options: &ResolveOptions,
        pattern: Option<&Regex>,
    ) -> Result<(BTreeMap<String, PathBuf>, String)> {
        let _span = info_span!("resolve", entry = %entry).entered();

        let (name, source) = {
            let _phase = set_phase(RelocationPhase::Resolving);
            self.locate_entry(entry)?
        };
        debug!("Entry module {} at {}", name, source.display());

        let search_path = match search_path::import_root(&name, &source) {
            Some(root) => self.search_path.with_leading_root(&root),
            None => self.search_path.clone(),
        };

        info!("Scanning dependent modules of {}. This may take some time...", name);
        let scanned = self.scanner.scan(&source, &name, &search_path)?;

        let _phase = set_phase(RelocationPhase::Filtering);
        let mut files: BTreeMap<String, PathBuf> = scanned
            .into_values()
            .filter_map(|module| {
                let file = module.file?;
                Some((module.name, normalize_source_path(&file)))
            })
            .collect();

        let filter = ScopeFilter::for_entry(options.scope, &name, &source, pattern);
        let mut files = filter.apply(files);
        debug!("Scope {} kept {} modules", options.scope, files.len());

        if options.drop_package_init_files {
            files.retain(|_, path| !is_package_init(path));
        }
        // The entry survives every filter
        files.insert(name.clone(), source.clone());

        info!("Scan complete. {} dependent modules found.", files.len());
        Ok((files, name))
    }

    /// Dotted name and absolute source path of an entry point.
    fn locate_entry(&self, entry: &EntryPoint) -> Result<(String, PathBuf)> {
        match entry {
            EntryPoint::File(path) => locate_defining_module(path),
            EntryPoint::Module(name) => {
                let location = self.search_path.locate(name).ok_or_else(|| {
                    Error::resolution(name, format!("no module named '{}'", name))
                })?;
                let source = location.source_file().ok_or_else(|| {
                    Error::resolution(
                        name,
                        format!("{} has no resolvable source file", location.kind()),
                    )
                })?;
                Ok((name.clone(), normalize_source_path(source)))
            }
        }
    }
}
