//! Thread-local context tracking for crash reports.
//!
//! Records which relocation phase is running, which package root is being
//! written and which file is being read or written, so a panic report can
//! say where things went wrong. Progress counters are global atomics.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static MODULES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static MODULES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<RelocationContext> =
        const { RefCell::new(RelocationContext::new()) };
}

/// Snapshot of what modreloc was doing.
#[derive(Debug, Clone, Default)]
pub struct RelocationContext {
    pub phase: Option<RelocationPhase>,
    /// Package root under construction while copying
    pub destination: Option<PathBuf>,
    pub current_file: Option<PathBuf>,
}

impl RelocationContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            destination: None,
            current_file: None,
        }
    }
}

/// Stages of a resolve/relocate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationPhase {
    /// Locating entry points on the search path
    Resolving,
    /// Walking the import graph
    Scanning,
    /// Applying the scope filter
    Filtering,
    /// Computing new names and checking collisions
    Planning,
    /// Writing the destination package
    Copying,
}

impl std::fmt::Display for RelocationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Resolving => "resolving",
            Self::Scanning => "scanning",
            Self::Filtering => "filtering",
            Self::Planning => "planning",
            Self::Copying => "copying",
        };
        f.pad(name)
    }
}

/// RAII guard restoring the previous context on drop, so contexts nest
/// (a file within a phase).
pub struct ContextGuard {
    previous: RelocationContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

/// Set the current phase until the returned guard drops.
#[must_use]
pub fn set_phase(phase: RelocationPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Set the package root being written until the returned guard drops.
#[must_use]
pub fn set_destination(root: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().destination = Some(root.into());
        ContextGuard { previous }
    })
}

/// Set the current file until the returned guard drops.
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

pub fn set_progress(processed: usize, total: usize) {
    MODULES_PROCESSED.store(processed, Ordering::Relaxed);
    MODULES_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    MODULES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> RelocationContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Current progress as (processed, total).
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        MODULES_PROCESSED.load(Ordering::Relaxed),
        MODULES_TOTAL.load(Ordering::Relaxed),
    )
}

/// Reset the current thread's context to empty.
pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = RelocationContext::new();
    });
}
