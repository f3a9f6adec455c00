//! Target layout, renaming and collision detection.
//!
//! Everything here is pure: a plan is computed from a [`Resolution`] and a
//! [`PackageLayout`] without touching the filesystem, so a collision is
//! always reported before anything is written.

use crate::errors::{CollidingPair, Error, Result};
use crate::resolver::Resolution;
use crate::utils::{detect_duplicates, zip_equal};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Old fully-qualified module name -> new fully-qualified module name.
pub type RenameMap = BTreeMap<String, String>;

pub const DEFAULT_HELPER_SUBPACKAGE: &str = "helpers";

/// Directories and dotted package names of the generated package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub root_dir: PathBuf,
    pub code_dir: PathBuf,
    pub code_package: String,
    pub helper_dir: PathBuf,
    pub helper_package: String,
}

impl PackageLayout {
    /// Layout under `destination_dir/root_package`. A `None` subpackage
    /// places that group directly in the root package.
    pub fn new(
        destination_dir: &Path,
        root_package: &str,
        code_subpackage: Option<&str>,
        helper_subpackage: Option<&str>,
    ) -> Result<Self> {
        validate_identifier("root package", root_package)?;
        if let Some(code) = code_subpackage {
            validate_identifier("code subpackage", code)?;
        }
        if let Some(helper) = helper_subpackage {
            validate_identifier("helper subpackage", helper)?;
        }

        let root_dir = destination_dir.join(root_package);
        let (code_dir, code_package) = subpackage(&root_dir, root_package, code_subpackage);
        let (helper_dir, helper_package) = subpackage(&root_dir, root_package, helper_subpackage);

        Ok(Self {
            root_dir,
            code_dir,
            code_package,
            helper_dir,
            helper_package,
        })
    }

    /// Root, code and helper directories without repeats.
    pub fn directories(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = Vec::with_capacity(3);
        for dir in [&self.root_dir, &self.code_dir, &self.helper_dir] {
            if !dirs.contains(&dir.as_path()) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// New dotted name for a module: code package for primaries, helper
    /// package otherwise, followed by the last segment of the old name.
    pub fn new_name(&self, old_name: &str, primary: bool) -> String {
        let package = if primary {
            &self.code_package
        } else {
            &self.helper_package
        };
        format!("{}.{}", package, last_segment(old_name))
    }

    /// Destination path for a module: its original file name inside the
    /// code or helper directory.
    pub fn destination(&self, source: &Path, primary: bool) -> PathBuf {
        let dir = if primary {
            &self.code_dir
        } else {
            &self.helper_dir
        };
        match source.file_name() {
            Some(file_name) => dir.join(file_name),
            None => dir.to_path_buf(),
        }
    }
}

fn subpackage(root_dir: &Path, root_package: &str, name: Option<&str>) -> (PathBuf, String) {
    match name {
        Some(name) => (root_dir.join(name), format!("{}.{}", root_package, name)),
        None => (root_dir.to_path_buf(), root_package.to_string()),
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Package names must be importable Python identifiers.
pub fn validate_identifier(what: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first == '_' || first.is_alphabetic())
                && chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "{} '{}' is not a valid Python identifier",
            what, name
        )))
    }
}

/// One module's move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedModule {
    pub old_name: String,
    pub new_name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub primary: bool,
}

/// Everything needed to write the new package.
#[derive(Debug, Clone)]
pub struct RelocationPlan {
    pub layout: PackageLayout,
    /// Sorted by old name; this is also the copy order
    pub modules: Vec<PlannedModule>,
    pub renames: RenameMap,
}

impl RelocationPlan {
    /// Destinations that more than one module is written to. The module
    /// copied last wins.
    pub fn shared_destinations(&self) -> Vec<PathBuf> {
        let destinations: Vec<&PathBuf> = self.modules.iter().map(|m| &m.destination).collect();
        let flags = detect_duplicates(destinations.iter().copied());
        let mut shared: Vec<PathBuf> = destinations
            .into_iter()
            .zip(flags)
            .filter(|(_, duplicate)| *duplicate)
            .map(|(destination, _)| destination.clone())
            .collect();
        shared.sort();
        shared.dedup();
        shared
    }
}

/// Compute the new name of every resolved module.
pub fn rename_modules(resolution: &Resolution, layout: &PackageLayout) -> RenameMap {
    resolution
        .iter()
        .map(|module| {
            let primary = resolution.is_primary(&module.name);
            (module.name.clone(), layout.new_name(&module.name, primary))
        })
        .collect()
}

/// Fail if two old names share a new name, listing every colliding pair.
pub fn check_collisions(renames: &RenameMap) -> Result<()> {
    let entries: Vec<(&String, &String)> = renames.iter().collect();
    let flags = detect_duplicates(entries.iter().map(|(_, new_name)| *new_name));

    let duplicated: HashSet<&String> = zip_equal(entries.iter(), flags)?
        .into_iter()
        .filter(|(_, duplicate)| *duplicate)
        .map(|((_, new_name), _)| *new_name)
        .collect();

    if duplicated.is_empty() {
        return Ok(());
    }

    let mut pairs: Vec<CollidingPair> = entries
        .into_iter()
        .filter(|(_, new_name)| duplicated.contains(new_name))
        .map(|(old_name, new_name)| CollidingPair {
            old_name: old_name.clone(),
            new_name: new_name.clone(),
        })
        .collect();
    pairs.sort_by(|a, b| (&a.new_name, &a.old_name).cmp(&(&b.new_name, &b.old_name)));

    Err(Error::Collision { pairs })
}

/// Build the relocation plan, rejecting rename collisions.
pub fn build_plan(resolution: &Resolution, layout: PackageLayout) -> Result<RelocationPlan> {
    let renames = rename_modules(resolution, &layout);
    check_collisions(&renames)?;

    let modules = resolution
        .iter()
        .map(|module| {
            let primary = resolution.is_primary(&module.name);
            PlannedModule {
                old_name: module.name.clone(),
                new_name: renames[&module.name].clone(),
                source: module.source.clone(),
                destination: layout.destination(&module.source, primary),
                primary,
            }
        })
        .collect();

    Ok(RelocationPlan {
        layout,
        modules,
        renames,
    })
}
