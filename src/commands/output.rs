//! Rendering of command results for the terminal and as JSON.

use crate::relocator::RelocationReport;
use crate::resolver::Resolution;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// `path` relative to `base` when possible, as given otherwise.
pub fn display_path(path: &Path, base: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .filter(|relative| !relative.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

pub fn format_resolution(resolution: &Resolution, base: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        "Resolved modules:".blue().bold(),
        resolution.len()
    );
    for record in resolution.iter() {
        let name = if record.primary {
            record.name.green().bold()
        } else {
            record.name.normal()
        };
        let _ = writeln!(
            out,
            "  {} {}",
            name,
            display_path(&record.source, base).dimmed()
        );
    }
    out
}

pub fn format_report(report: &RelocationReport, base: &Path) -> String {
    let mut out = String::new();
    let header = if report.dry_run {
        "Planned relocation (dry run):"
    } else {
        "Relocated modules:"
    };
    let _ = writeln!(
        out,
        "{} {} -> {}",
        header.blue().bold(),
        report.modules.len(),
        display_path(&report.root_dir, base)
    );
    for module in &report.modules {
        let new_name = if module.primary {
            module.new_name.green().bold()
        } else {
            module.new_name.normal()
        };
        let _ = writeln!(out, "  {} -> {}", module.old_name.dimmed(), new_name);
    }
    for destination in &report.overwritten {
        let _ = writeln!(
            out,
            "{} {} is written by more than one module",
            "warning:".yellow().bold(),
            display_path(destination, base)
        );
    }
    out
}
