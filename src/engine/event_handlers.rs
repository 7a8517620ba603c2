// src/engine/event_handlers.rs

//! Event handling logic for the watch core.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::engine::core::{BindingSlot, BindingState};
use crate::engine::{RunReport, RuntimeOptions, ScheduledRun};
use crate::types::BindingName;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Hand this run to the executor.
    DispatchRun(ScheduledRun),
    /// Request that the process exits (only with `exit_when_idle`).
    RequestExit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn keep_going(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Handle a change that matched `binding`.
///
/// Every trigger on an armed binding dispatches a fresh run, even when an
/// earlier run of the same binding is still in flight.
pub fn handle_binding_trigger(
    slots: &mut BTreeMap<BindingName, BindingSlot>,
    run_counter: &mut u64,
    binding: BindingName,
    path: PathBuf,
) -> CoreStep {
    let Some(slot) = slots.get_mut(&binding) else {
        warn!(%binding, "trigger for unknown binding; ignoring");
        return CoreStep::keep_going(Vec::new());
    };

    if slot.state == BindingState::Idle {
        debug!(%binding, "binding not armed yet; ignoring trigger");
        return CoreStep::keep_going(Vec::new());
    }

    *run_counter += 1;
    slot.in_flight += 1;
    slot.started += 1;
    slot.state = BindingState::Running;

    info!(
        %binding,
        run_id = *run_counter,
        path = %path.display(),
        in_flight = slot.in_flight,
        "change detected; dispatching run"
    );

    CoreStep::keep_going(vec![CoreCommand::DispatchRun(ScheduledRun {
        binding,
        run_id: *run_counter,
        node: slot.node.clone(),
        trigger: path,
    })])
}

/// Handle the completion of a dispatched run.
///
/// A failed run is reported but leaves the binding armed; watch mode never
/// stops because a rebuild failed.
pub fn handle_run_completion(
    slots: &mut BTreeMap<BindingName, BindingSlot>,
    options: &RuntimeOptions,
    binding: BindingName,
    run_id: u64,
    report: RunReport,
) -> CoreStep {
    let mut commands = Vec::new();

    match slots.get_mut(&binding) {
        None => warn!(%binding, run_id, "completion for unknown binding"),
        Some(slot) => {
            slot.in_flight = slot.in_flight.saturating_sub(1);
            if report.is_success() {
                slot.succeeded += 1;
                info!(%binding, run_id, tasks = report.tasks.len(), "run finished");
            } else {
                slot.failed += 1;
                error!(
                    %binding,
                    run_id,
                    failed = ?report.failed_tasks(),
                    "run failed; still watching"
                );
            }
            if slot.in_flight == 0 {
                slot.state = BindingState::Armed;
            }
        }
    }

    let mut keep_running = true;
    if options.exit_when_idle && slots.values().all(|s| s.in_flight == 0) {
        keep_running = false;
        commands.push(CoreCommand::RequestExit);
    }

    CoreStep {
        commands,
        keep_running,
    }
}
