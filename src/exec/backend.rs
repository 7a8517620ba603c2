// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of a raw channel, so
//! tests can record dispatched runs and answer with synthetic completions
//! while production code executes the real task tree.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::{RuntimeEvent, ScheduledRun};
use crate::errors::{AssetdagError, Result};

use super::executor_loop::spawn_executor;

/// How scheduled runs get executed.
pub trait ExecutorBackend: Send {
    /// Start `run`. Implementations must eventually emit exactly one
    /// `RuntimeEvent::RunCompleted` for it and must not wait for it to
    /// finish here.
    fn dispatch_run(
        &mut self,
        run: ScheduledRun,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: forwards runs to the background executor loop.
pub struct RealExecutorBackend {
    tx: mpsc::Sender<ScheduledRun>,
}

impl RealExecutorBackend {
    /// Spawns the executor loop immediately; completions are sent to
    /// `runtime_tx`.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        let tx = spawn_executor(runtime_tx);
        Self { tx }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn dispatch_run(
        &mut self,
        run: ScheduledRun,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.tx.clone();

        Box::pin(async move {
            tx.send(run).await.map_err(|err| {
                AssetdagError::Other(anyhow::anyhow!(
                    "executor loop stopped; dropped run {} of '{}'",
                    err.0.run_id,
                    err.0.binding
                ))
            })
        })
    }
}
