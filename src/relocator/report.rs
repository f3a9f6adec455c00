use super::plan::RelocationPlan;
use serde::Serialize;
use std::path::PathBuf;

/// One module as copied (or, on a dry run, as it would be copied).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedModule {
    pub old_name: String,
    pub new_name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub primary: bool,
}

/// Outcome of a relocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocationReport {
    pub root_dir: PathBuf,
    pub code_package: String,
    pub helper_package: String,
    pub modules: Vec<CopiedModule>,
    /// Destinations written by more than one module; the last copy wins
    pub overwritten: Vec<PathBuf>,
    pub dry_run: bool,
}

impl RelocationReport {
    pub fn from_plan(plan: &RelocationPlan, dry_run: bool) -> Self {
        Self {
            root_dir: plan.layout.root_dir.clone(),
            code_package: plan.layout.code_package.clone(),
            helper_package: plan.layout.helper_package.clone(),
            modules: plan
                .modules
                .iter()
                .map(|module| CopiedModule {
                    old_name: module.old_name.clone(),
                    new_name: module.new_name.clone(),
                    source: module.source.clone(),
                    destination: module.destination.clone(),
                    primary: module.primary,
                })
                .collect(),
            overwritten: plan.shared_destinations(),
            dry_run,
        }
    }

    /// Number of distinct files the run leaves in the destination package,
    /// excluding generated empty initializers.
    pub fn distinct_destinations(&self) -> usize {
        let mut destinations: Vec<&PathBuf> = self.modules.iter().map(|m| &m.destination).collect();
        destinations.sort();
        destinations.dedup();
        destinations.len()
    }
}
