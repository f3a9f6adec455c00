//! Crash reports for panics.
//!
//! A panic while copying leaves the destination package half written, so
//! the report names the package root, the module being copied and how far
//! the copy got, and tells the user how to recover.

use super::context::{get_current_context, get_progress, RelocationContext, RelocationPhase};
use std::fmt::Write as _;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the crash report hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = panic_message(info);
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let report = crash_report(
            &message,
            location.as_deref(),
            &get_current_context(),
            get_progress(),
        );
        eprintln!("\n{}", report);
    }));
}

/// Render the report for a panic with `message`, raised at `location`,
/// while modreloc was in `context` with `(copied, total)` progress.
fn crash_report(
    message: &str,
    location: Option<&str>,
    context: &RelocationContext,
    (copied, total): (usize, usize),
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "modreloc {} crashed on {} at {}",
        VERSION,
        std::env::consts::OS,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "  panic: {}", message);
    if let Some(location) = location {
        let _ = writeln!(out, "  at: {}", location);
    }

    match context.phase {
        Some(phase) => {
            let _ = writeln!(out, "  while {}", phase);
        }
        None => {
            let _ = writeln!(out, "  before resolution started");
        }
    }
    if let Some(file) = &context.current_file {
        let _ = writeln!(out, "  module file: {}", file.display());
    }

    if context.phase == Some(RelocationPhase::Copying) {
        if let Some(root) = &context.destination {
            let _ = writeln!(out, "  package root: {}", root.display());
        }
        if total > 0 {
            let _ = writeln!(out, "  copied {} of {} modules", copied, total);
        }
        let _ = write!(
            out,
            "The package is incomplete. Re-run with --clear to rebuild it from scratch."
        );
    } else {
        let _ = write!(
            out,
            "Nothing was written. Set RUST_BACKTRACE=1 for a stack trace."
        );
    }
    out
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
