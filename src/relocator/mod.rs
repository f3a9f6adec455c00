//! Module relocation.
//!
//! Copies a resolved module set into a new self-contained package:
//!
//! ```text
//! <destination>/<root_package>/__init__.py
//! <destination>/<root_package>[/<code_subpackage>]/<entry modules>
//! <destination>/<root_package>/<helper_subpackage>/<everything else>
//! ```
//!
//! The hierarchy of the original packages is flattened: a module keeps only
//! the last segment of its dotted name. Import statements in every copied
//! file are rewritten to the new names.
//!
//! Collisions are detected before the destination is touched. Any later
//! I/O failure leaves the destination half written; re-run with
//! `clear_existing` to start from a clean tree.

pub mod plan;
pub mod report;
pub mod rewrite;

pub use plan::{
    build_plan, check_collisions, rename_modules, PackageLayout, PlannedModule, RelocationPlan,
    RenameMap, DEFAULT_HELPER_SUBPACKAGE,
};
pub use report::{CopiedModule, RelocationReport};
pub use rewrite::{rewrite_imports, rewrite_module_reference};

use crate::errors::Result;
use crate::io::FileSystem;
use crate::observability::{
    increment_processed, set_current_file, set_destination, set_phase, set_progress,
    RelocationPhase,
};
use crate::resolver::{EntryPoint, ResolveOptions, Resolver, Scope};
use crate::scanner::ImportScanner;
use std::path::PathBuf;
use tracing::{debug, info, info_span, warn};

const PACKAGE_INIT: &str = "__init__.py";

/// Options for one relocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocateOptions {
    pub destination_dir: PathBuf,
    pub root_package: String,
    pub scope: Scope,
    pub project_root_pattern: Option<String>,
    pub code_subpackage: Option<String>,
    pub helper_subpackage: Option<String>,
    /// Recursively delete an existing `destination_dir/root_package` first.
    /// Irreversible.
    pub clear_existing: bool,
    pub drop_package_init_files: bool,
    /// Plan and check collisions without writing anything
    pub dry_run: bool,
}

impl RelocateOptions {
    pub fn new(destination_dir: impl Into<PathBuf>, root_package: impl Into<String>) -> Self {
        Self {
            destination_dir: destination_dir.into(),
            root_package: root_package.into(),
            scope: Scope::Project,
            project_root_pattern: None,
            code_subpackage: None,
            helper_subpackage: Some(DEFAULT_HELPER_SUBPACKAGE.to_string()),
            clear_existing: false,
            drop_package_init_files: false,
            dry_run: false,
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            scope: self.scope,
            project_root_pattern: self.project_root_pattern.clone(),
            drop_package_init_files: self.drop_package_init_files,
        }
    }

    pub fn layout(&self) -> Result<PackageLayout> {
        PackageLayout::new(
            &self.destination_dir,
            &self.root_package,
            self.code_subpackage.as_deref(),
            self.helper_subpackage.as_deref(),
        )
    }
}

/// Resolve `entry_points` and copy their modules into a new package.
pub fn relocate<S, F>(
    resolver: &Resolver<S>,
    fs: &F,
    entry_points: &[EntryPoint],
    options: &RelocateOptions,
) -> Result<RelocationReport>
where
    S: ImportScanner,
    F: FileSystem,
{
    let _span = info_span!("relocate", root_package = %options.root_package).entered();

    let layout = options.layout()?;
    let resolution = resolver.resolve(entry_points, &options.resolve_options())?;

    let plan = {
        let _phase = set_phase(RelocationPhase::Planning);
        let plan = build_plan(&resolution, layout)?;
        for (old_name, new_name) in &plan.renames {
            debug!("{} -> {}", old_name, new_name);
        }
        plan
    };

    let report = RelocationReport::from_plan(&plan, options.dry_run);
    for destination in &report.overwritten {
        warn!(
            "Several modules are copied to {}; only the last one is kept",
            destination.display()
        );
    }

    if options.dry_run {
        info!("Dry run: {} modules planned", plan.modules.len());
        return Ok(report);
    }

    write_package(fs, &plan, options.clear_existing)?;
    Ok(report)
}

fn write_package<F: FileSystem>(fs: &F, plan: &RelocationPlan, clear_existing: bool) -> Result<()> {
    let _phase = set_phase(RelocationPhase::Copying);
    let layout = &plan.layout;
    let _destination = set_destination(&layout.root_dir);

    if clear_existing && fs.exists(&layout.root_dir) {
        info!("Removing existing package {}", layout.root_dir.display());
        fs.remove_dir_all(&layout.root_dir)?;
    }

    for dir in layout.directories() {
        fs.create_dir_all(dir)?;
        fs.write(&dir.join(PACKAGE_INIT), "")?;
    }

    set_progress(0, plan.modules.len());
    for module in &plan.modules {
        let _file = set_current_file(&module.source);
        let text = fs.read_to_string(&module.source)?;
        let rewritten = rewrite_imports(&text, &plan.renames);
        fs.write(&module.destination, &rewritten)?;
        increment_processed();
        info!(
            "Copied {} -> {}",
            module.source.display(),
            module.destination.display()
        );
    }

    Ok(())
}
