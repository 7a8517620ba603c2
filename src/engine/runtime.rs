// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::ExecutorBackend;

use super::core::WatchCore;
use super::{CoreCommand, RuntimeEvent, ScheduledRun};

/// Drives the [`WatchCore`] in response to [`RuntimeEvent`]s and delegates
/// run execution to an [`ExecutorBackend`].
///
/// All watch semantics live in the core; this struct only reads events,
/// feeds them in, and carries out the resulting commands.
pub struct Runtime<E: ExecutorBackend> {
    core: WatchCore,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(core: WatchCore, event_rx: mpsc::Receiver<RuntimeEvent>, executor: E) -> Self {
        Self {
            core,
            event_rx,
            executor,
        }
    }

    /// Arm every binding, then process events until shutdown.
    pub async fn run(mut self) -> Result<()> {
        self.core.arm();
        let bindings: Vec<_> = self.core.binding_names().map(str::to_string).collect();
        info!(?bindings, "watching for changes");

        loop {
            let Some(event) = self.event_rx.recv().await else {
                info!("runtime event channel closed; exiting");
                break;
            };

            debug!(?event, "runtime received event");
            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::DispatchRun(run) => self.dispatch(run).await?,
            CoreCommand::RequestExit => debug!("core issued RequestExit command"),
        }
        Ok(())
    }

    async fn dispatch(&mut self, run: ScheduledRun) -> Result<()> {
        debug!(binding = %run.binding, run_id = run.run_id, "dispatching run");
        self.executor.dispatch_run(run).await
    }
}
