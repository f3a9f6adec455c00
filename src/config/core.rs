use crate::resolver::Scope;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for modreloc
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModrelocConfig {
    /// Extra module search roots, relative to the config file
    pub search_paths: Vec<PathBuf>,

    /// Resolution options
    pub resolve: ResolveSettings,

    /// Relocation options
    pub relocate: RelocateSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveSettings {
    pub scope: Option<Scope>,
    pub project_root_pattern: Option<String>,
    pub drop_package_init_files: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelocateSettings {
    pub code_subpackage: Option<String>,
    pub helper_subpackage: Option<String>,
    pub clear_existing: Option<bool>,
}

impl ModrelocConfig {
    /// Make relative search paths relative to `base_dir`.
    pub fn anchor_search_paths(mut self, base_dir: &std::path::Path) -> Self {
        self.search_paths = self
            .search_paths
            .into_iter()
            .map(|path| {
                if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                }
            })
            .collect();
        self
    }
}
