use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use assetdag::engine::{RunReport, RuntimeEvent, ScheduledRun, TaskReport};
use assetdag::errors::{AssetdagError, Result};
use assetdag::exec::ExecutorBackend;
use assetdag::types::TaskOutcome;
use tokio::sync::mpsc;

/// A fake executor that:
/// - records `(binding, run_id)` for every dispatched run
/// - immediately reports `RunCompleted`, successful unless the binding is
///   listed in `failing`.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    dispatched: Arc<Mutex<Vec<(String, u64)>>>,
    failing: Vec<String>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        dispatched: Arc<Mutex<Vec<(String, u64)>>>,
    ) -> Self {
        Self {
            runtime_tx,
            dispatched,
            failing: Vec::new(),
        }
    }

    pub fn failing(mut self, binding: &str) -> Self {
        self.failing.push(binding.to_string());
        self
    }
}

impl ExecutorBackend for FakeExecutor {
    fn dispatch_run(
        &mut self,
        run: ScheduledRun,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let dispatched = Arc::clone(&self.dispatched);
        let fails = self.failing.contains(&run.binding);

        Box::pin(async move {
            dispatched
                .lock()
                .unwrap()
                .push((run.binding.clone(), run.run_id));

            let outcome = if fails {
                TaskOutcome::Failed("fake failure".to_string())
            } else {
                TaskOutcome::Success
            };
            let report = RunReport {
                tasks: vec![TaskReport {
                    task: run.node.label().to_string(),
                    outcome,
                    elapsed: std::time::Duration::ZERO,
                }],
            };

            tx.send(RuntimeEvent::RunCompleted {
                binding: run.binding,
                run_id: run.run_id,
                report,
            })
            .await
            .map_err(|e| AssetdagError::Other(anyhow::anyhow!("runtime channel closed: {e}")))
        })
    }
}
