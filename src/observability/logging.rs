//! Process-wide tracing subscriber.
//!
//! Initialized once from `main`; library code only uses the `tracing`
//! macros and never installs a subscriber itself.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter directive, e.g.
/// `MODRELOC_LOG=modreloc::scanner=trace`.
pub const LOG_ENV_VAR: &str = "MODRELOC_LOG";

/// Filter directive for a `-v` count: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber writing to stderr.
///
/// `MODRELOC_LOG` takes precedence over the verbosity level. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .try_init();
}
