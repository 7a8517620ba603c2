// src/exec/runner.rs

//! Executes a single scheduled run.

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::engine::{RuntimeEvent, ScheduledRun, execute};

/// Run the binding's composite and report the result to the runtime.
pub async fn run_binding(run: ScheduledRun, runtime_tx: mpsc::Sender<RuntimeEvent>) {
    info!(
        binding = %run.binding,
        run_id = run.run_id,
        composite = run.node.label(),
        trigger = %run.trigger.display(),
        "starting run"
    );

    let started = Instant::now();
    let report = execute(&run.node).await;

    info!(
        binding = %run.binding,
        run_id = run.run_id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        success = report.is_success(),
        "run exited"
    );

    let completed = RuntimeEvent::RunCompleted {
        binding: run.binding.clone(),
        run_id: run.run_id,
        report,
    };
    if let Err(err) = runtime_tx.send(completed).await {
        error!(
            binding = %run.binding,
            run_id = run.run_id,
            error = %err,
            "failed to report run completion to runtime"
        );
    }
}
