//! Scope filtering of discovered modules.

use crate::errors::Result;
use clap::ValueEnum;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which discovered modules to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Modules sharing the entry point's top-level package
    Package,
    /// Modules under the entry point's project directory
    #[default]
    Project,
    /// Everything reachable, including third-party and standard library code
    All,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => write!(f, "package"),
            Self::Project => write!(f, "project"),
            Self::All => write!(f, "all"),
        }
    }
}

/// A scope bound to one entry module.
#[derive(Debug, Clone)]
pub enum ScopeFilter {
    Package { top_level: String },
    ProjectDir { base_dir: PathBuf },
    ProjectPattern(Regex),
    All,
}

impl ScopeFilter {
    /// Bind `scope` to the entry module `entry_name` defined in `entry_file`.
    ///
    /// For `Project` without a pattern the base directory is the grandparent
    /// of the entry file, matched as a plain string prefix of each source
    /// path (`/p/pkg` also keeps `/p/pkgx/mod.py`).
    pub fn for_entry(
        scope: Scope,
        entry_name: &str,
        entry_file: &Path,
        project_root_pattern: Option<&Regex>,
    ) -> Self {
        match scope {
            Scope::Package => Self::Package {
                top_level: top_level_name(entry_name).to_string(),
            },
            Scope::Project => match project_root_pattern {
                Some(pattern) => Self::ProjectPattern(pattern.clone()),
                None => Self::ProjectDir {
                    base_dir: grandparent(entry_file),
                },
            },
            Scope::All => Self::All,
        }
    }

    pub fn keeps(&self, name: &str, source: &Path) -> bool {
        match self {
            Self::Package { top_level } => top_level_name(name) == top_level,
            Self::ProjectDir { base_dir } => source
                .to_string_lossy()
                .starts_with(base_dir.to_string_lossy().as_ref()),
            Self::ProjectPattern(pattern) => pattern.is_match(&source.to_string_lossy()),
            Self::All => true,
        }
    }

    pub fn apply(&self, modules: BTreeMap<String, PathBuf>) -> BTreeMap<String, PathBuf> {
        modules
            .into_iter()
            .filter(|(name, source)| self.keeps(name, source))
            .collect()
    }
}

/// Compile a project root pattern for case-insensitive search.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

fn top_level_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn grandparent(file: &Path) -> PathBuf {
    file.ancestors()
        .nth(2)
        .or_else(|| file.ancestors().last())
        .unwrap_or(file)
        .to_path_buf()
}
