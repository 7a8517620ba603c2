// src/engine/mod.rs

//! Orchestration engine for assetdag.
//!
//! - [`run`] executes a composite tree once (`build`, `scripts`, ...).
//! - [`core`] is the pure watch-mode state machine: it turns binding
//!   triggers and run completions into commands.
//! - [`runtime`] is the async shell that feeds events into the core and
//!   hands scheduled runs to an [`crate::exec::ExecutorBackend`].

use std::path::PathBuf;

use crate::dag::TaskNode;
use crate::types::BindingName;

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Exit once no binding has a run in flight. Used by tests.
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the watcher, executor and signals.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A changed path matched a watch binding.
    BindingTriggered { binding: BindingName, path: PathBuf },
    /// A run dispatched for `binding` has finished.
    RunCompleted {
        binding: BindingName,
        run_id: u64,
        report: RunReport,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// One execution of a binding's composite, handed to the executor.
#[derive(Debug, Clone)]
pub struct ScheduledRun {
    pub binding: BindingName,
    pub run_id: u64,
    pub node: TaskNode,
    pub trigger: PathBuf,
}

pub mod core;
pub mod event_handlers;
pub mod run;
pub mod runtime;

pub use core::{BindingSlot, BindingState, WatchCore};
pub use event_handlers::{CoreCommand, CoreStep};
pub use run::{RunReport, TaskReport, execute};
pub use runtime::Runtime;
