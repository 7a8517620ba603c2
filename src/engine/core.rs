// src/engine/core.rs

//! Pure watch-mode state machine.
//!
//! [`WatchCore`] consumes [`RuntimeEvent`]s and produces commands for the
//! IO shell. It owns no channels, no Tokio types and performs no IO, so it
//! can be tested by feeding events directly.
//!
//! Each binding moves `Idle -> Armed` once when watch mode begins, then
//! `Armed -> Running -> Armed` for every change. Runs are never coalesced:
//! a trigger that arrives while a run is in flight dispatches another run,
//! and the binding returns to `Armed` when its last run finishes.

use std::collections::BTreeMap;

use crate::dag::TaskNode;
use crate::engine::event_handlers::{CoreStep, handle_binding_trigger, handle_run_completion};
use crate::engine::{RuntimeEvent, RuntimeOptions};
use crate::types::BindingName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Idle,
    Armed,
    Running,
}

/// Per-binding bookkeeping.
#[derive(Debug, Clone)]
pub struct BindingSlot {
    pub(crate) node: TaskNode,
    pub(crate) state: BindingState,
    pub(crate) in_flight: usize,
    pub(crate) started: u64,
    pub(crate) succeeded: u64,
    pub(crate) failed: u64,
}

impl BindingSlot {
    pub fn new(node: TaskNode) -> Self {
        Self {
            node,
            state: BindingState::Idle,
            in_flight: 0,
            started: 0,
            succeeded: 0,
            failed: 0,
        }
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn runs_started(&self) -> u64 {
        self.started
    }

    pub fn runs_succeeded(&self) -> u64 {
        self.succeeded
    }

    pub fn runs_failed(&self) -> u64 {
        self.failed
    }
}

#[derive(Debug)]
pub struct WatchCore {
    slots: BTreeMap<BindingName, BindingSlot>,
    run_counter: u64,
    options: RuntimeOptions,
}

impl WatchCore {
    pub fn new(
        bindings: impl IntoIterator<Item = (BindingName, TaskNode)>,
        options: RuntimeOptions,
    ) -> Self {
        let slots = bindings
            .into_iter()
            .map(|(name, node)| (name, BindingSlot::new(node)))
            .collect();
        Self {
            slots,
            run_counter: 0,
            options,
        }
    }

    /// Move every idle binding to `Armed`. Triggers for unarmed bindings
    /// are ignored.
    pub fn arm(&mut self) {
        for slot in self.slots.values_mut() {
            if slot.state == BindingState::Idle {
                slot.state = BindingState::Armed;
            }
        }
    }

    pub fn binding(&self, name: &str) -> Option<&BindingSlot> {
        self.slots.get(name)
    }

    pub fn binding_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// No binding has a run in flight.
    pub fn is_idle(&self) -> bool {
        self.slots.values().all(|s| s.in_flight == 0)
    }

    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::BindingTriggered { binding, path } => {
                handle_binding_trigger(&mut self.slots, &mut self.run_counter, binding, path)
            }
            RuntimeEvent::RunCompleted {
                binding,
                run_id,
                report,
            } => handle_run_completion(&mut self.slots, &self.options, binding, run_id, report),
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::Settings;
    use crate::engine::{CoreCommand, RunReport, TaskReport};
    use crate::task::Task;
    use crate::types::{Feature, TaskOutcome};

    fn node() -> TaskNode {
        Task::new("styles:build", Feature::Styles, Settings::default(), || async {
            Ok::<(), anyhow::Error>(())
        })
        .into()
    }

    fn core(options: RuntimeOptions) -> WatchCore {
        let mut core = WatchCore::new([("styles".to_string(), node())], options);
        core.arm();
        core
    }

    fn trigger(core: &mut WatchCore) -> CoreStep {
        core.step(RuntimeEvent::BindingTriggered {
            binding: "styles".into(),
            path: PathBuf::from("src/sass/main.scss"),
        })
    }

    fn dispatched(step: &CoreStep) -> Vec<u64> {
        step.commands
            .iter()
            .filter_map(|c| match c {
                CoreCommand::DispatchRun(run) => Some(run.run_id),
                _ => None,
            })
            .collect()
    }

    fn report(outcome: TaskOutcome) -> RunReport {
        RunReport {
            tasks: vec![TaskReport {
                task: "styles:build".into(),
                outcome,
                elapsed: std::time::Duration::ZERO,
            }],
        }
    }

    #[test]
    fn unarmed_bindings_ignore_triggers() {
        let mut core = WatchCore::new([("styles".to_string(), node())], RuntimeOptions::default());
        let step = trigger(&mut core);
        assert!(step.commands.is_empty());
        assert_eq!(core.binding("styles").unwrap().state(), BindingState::Idle);
    }

    #[test]
    fn rapid_triggers_each_dispatch_a_run() {
        let mut core = core(RuntimeOptions::default());

        let first = trigger(&mut core);
        let second = trigger(&mut core);

        assert_eq!(dispatched(&first), [1]);
        assert_eq!(dispatched(&second), [2]);
        let slot = core.binding("styles").unwrap();
        assert_eq!(slot.state(), BindingState::Running);
        assert_eq!(slot.in_flight(), 2);
    }

    #[test]
    fn binding_rearms_after_last_run_even_on_failure() {
        let mut core = core(RuntimeOptions::default());
        trigger(&mut core);
        trigger(&mut core);

        core.step(RuntimeEvent::RunCompleted {
            binding: "styles".into(),
            run_id: 1,
            report: report(TaskOutcome::Failed("syntax error".into())),
        });
        assert_eq!(core.binding("styles").unwrap().state(), BindingState::Running);

        let step = core.step(RuntimeEvent::RunCompleted {
            binding: "styles".into(),
            run_id: 2,
            report: report(TaskOutcome::Success),
        });
        assert!(step.keep_running);

        let slot = core.binding("styles").unwrap();
        assert_eq!(slot.state(), BindingState::Armed);
        assert_eq!(slot.runs_started(), 2);
        assert_eq!((slot.runs_succeeded(), slot.runs_failed()), (1, 1));
        assert!(core.is_idle());
    }

    #[test]
    fn exit_when_idle_stops_after_last_completion() {
        let mut core = core(RuntimeOptions {
            exit_when_idle: true,
        });
        trigger(&mut core);

        let step = core.step(RuntimeEvent::RunCompleted {
            binding: "styles".into(),
            run_id: 1,
            report: report(TaskOutcome::Success),
        });

        assert!(!step.keep_running);
        assert!(matches!(step.commands.as_slice(), [CoreCommand::RequestExit]));
    }

    #[test]
    fn unknown_binding_is_ignored() {
        let mut core = core(RuntimeOptions::default());
        let step = core.step(RuntimeEvent::BindingTriggered {
            binding: "fonts".into(),
            path: PathBuf::from("src/fonts/a.woff"),
        });
        assert!(step.commands.is_empty());
        assert!(step.keep_running);
    }
}
