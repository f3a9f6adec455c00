use super::output::{format_report, to_json};
use super::{build_resolver, load_settings, merge_resolve_options, parse_entry_points};
use crate::cli::{OutputFormat, ResolveArgs};
use crate::config::ModrelocConfig;
use crate::io::RealFileSystem;
use crate::relocator::{self, RelocateOptions, DEFAULT_HELPER_SUBPACKAGE};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct RelocateConfig {
    pub resolve: ResolveArgs,
    pub destination_dir: PathBuf,
    pub root_package: String,
    pub code_subpackage: Option<String>,
    pub helper_subpackage: Option<String>,
    pub flat_helpers: bool,
    pub clear_existing: bool,
    pub dry_run: bool,
}

/// Relocation options with command-line values taking precedence over the
/// file.
pub fn relocate_options(config: &RelocateConfig, file: &ModrelocConfig) -> RelocateOptions {
    let resolve = merge_resolve_options(&config.resolve, file);
    let helper_subpackage = if config.flat_helpers {
        None
    } else {
        Some(
            config
                .helper_subpackage
                .clone()
                .or_else(|| file.relocate.helper_subpackage.clone())
                .unwrap_or_else(|| DEFAULT_HELPER_SUBPACKAGE.to_string()),
        )
    };

    RelocateOptions {
        destination_dir: config.destination_dir.clone(),
        root_package: config.root_package.clone(),
        scope: resolve.scope,
        project_root_pattern: resolve.project_root_pattern,
        code_subpackage: config
            .code_subpackage
            .clone()
            .or_else(|| file.relocate.code_subpackage.clone()),
        helper_subpackage,
        clear_existing: config.clear_existing || file.relocate.clear_existing.unwrap_or(false),
        drop_package_init_files: resolve.drop_package_init_files,
        dry_run: config.dry_run,
    }
}

pub fn run_relocate(config: RelocateConfig) -> Result<()> {
    let file = load_settings(config.resolve.config.as_deref())?;
    let options = relocate_options(&config, &file);
    let resolver = build_resolver(&config.resolve, &file);
    let entry_points = parse_entry_points(&config.resolve);

    let report = relocator::relocate(&resolver, &RealFileSystem::new(), &entry_points, &options)
        .with_context(|| {
            format!(
                "Failed to relocate into {}",
                options.destination_dir.join(&options.root_package).display()
            )
        })?;

    match config.resolve.format {
        OutputFormat::Json => println!("{}", to_json(&report)?),
        OutputFormat::Terminal => {
            let base = std::env::current_dir().unwrap_or_default();
            print!("{}", format_report(&report, &base));
        }
    }
    Ok(())
}
