//! Observability infrastructure: logging setup, crash reports and context
//! tracking.
//!
//! ## Usage
//!
//! Install the panic hook and the subscriber at application startup:
//!
//! ```ignore
//! use modreloc::observability::{init_tracing, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_tracing(verbosity);
//!     // ... rest of application
//! }
//! ```
//!
//! Track context while relocating:
//!
//! ```ignore
//! use modreloc::observability::{set_current_file, set_phase, RelocationPhase};
//!
//! let _phase = set_phase(RelocationPhase::Copying);
//! for module in &plan.modules {
//!     let _file = set_current_file(&module.source);
//!     // If a panic occurs here, the crash report shows phase and file
//! }
//! ```

pub mod context;
pub mod logging;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_file, set_destination,
    set_phase, set_progress, ContextGuard, RelocationContext, RelocationPhase,
};
pub use logging::init_tracing;
pub use panic_hook::install_panic_hook;
