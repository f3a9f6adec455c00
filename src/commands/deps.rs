use super::output::{format_resolution, to_json};
use super::{build_resolver, load_settings, merge_resolve_options, parse_entry_points};
use crate::cli::{OutputFormat, ResolveArgs};
use anyhow::{Context, Result};

pub struct DepsConfig {
    pub resolve: ResolveArgs,
}

pub fn list_dependencies(config: DepsConfig) -> Result<()> {
    let file = load_settings(config.resolve.config.as_deref())?;
    let options = merge_resolve_options(&config.resolve, &file);
    let resolver = build_resolver(&config.resolve, &file);
    let entry_points = parse_entry_points(&config.resolve);

    let resolution = resolver
        .resolve(&entry_points, &options)
        .with_context(|| format!("Failed to resolve {}", config.resolve.entries.join(", ")))?;

    match config.resolve.format {
        OutputFormat::Json => println!("{}", to_json(&resolution)?),
        OutputFormat::Terminal => {
            let base = std::env::current_dir().unwrap_or_default();
            print!("{}", format_resolution(&resolution, &base));
        }
    }
    Ok(())
}
