// src/exec/executor_loop.rs

//! Background loop that turns scheduled runs into Tokio tasks.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::{RuntimeEvent, ScheduledRun};
use crate::exec::runner::run_binding;

/// Spawn the executor loop and return the sender the backend feeds.
///
/// Each run gets its own Tokio task, so a slow rebuild never delays the
/// dispatch of the next one. Runs of the same binding may overlap.
pub fn spawn_executor(runtime_tx: mpsc::Sender<RuntimeEvent>) -> mpsc::Sender<ScheduledRun> {
    let (tx, mut rx) = mpsc::channel::<ScheduledRun>(32);

    tokio::spawn(async move {
        info!("executor loop started");

        while let Some(run) = rx.recv().await {
            debug!(binding = %run.binding, run_id = run.run_id, "executor received run");
            tokio::spawn(run_binding(run, runtime_tx.clone()));
        }

        info!("executor loop finished (no more scheduled runs)");
    });

    tx
}
