// src/engine/run.rs

//! Composition engine: executes a [`TaskNode`] tree.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::warn;

use crate::dag::TaskNode;
use crate::types::{TaskName, TaskOutcome};

/// Outcome of one primitive within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub task: TaskName,
    pub outcome: TaskOutcome,
    pub elapsed: Duration,
}

/// Every primitive that actually ran (or was skipped) during a run, in
/// completion order. Tasks after a failed sequence step are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.tasks.iter().all(|t| t.outcome.is_done())
    }

    pub fn failed_tasks(&self) -> Vec<TaskName> {
        self.tasks
            .iter()
            .filter(|t| !t.outcome.is_done())
            .map(|t| t.task.clone())
            .collect()
    }

    pub fn outcome_of(&self, task: &str) -> Option<&TaskOutcome> {
        self.tasks.iter().find(|t| t.task == task).map(|t| &t.outcome)
    }

    /// How many times `task` ran in this report.
    pub fn count(&self, task: &str) -> usize {
        self.tasks.iter().filter(|t| t.task == task).count()
    }

    fn merge(&mut self, other: RunReport) {
        self.tasks.extend(other.tasks);
    }
}

/// Execute `node`:
///
/// - a leaf runs its task once;
/// - a sequence runs children in order and stops after the first child that
///   fails, leaving later children unstarted;
/// - a parallel starts every child and waits for all of them, even when
///   some fail.
pub fn execute(node: &TaskNode) -> Pin<Box<dyn Future<Output = RunReport> + Send + '_>> {
    Box::pin(async move {
        match node {
            TaskNode::Task(task) => {
                let started = Instant::now();
                let outcome = task.run().await;
                RunReport {
                    tasks: vec![TaskReport {
                        task: task.name().to_string(),
                        outcome,
                        elapsed: started.elapsed(),
                    }],
                }
            }
            TaskNode::Sequence { children, .. } => {
                let mut report = RunReport::default();
                for (idx, child) in children.iter().enumerate() {
                    let child_report = execute(child).await;
                    let ok = child_report.is_success();
                    report.merge(child_report);
                    if !ok {
                        let skipped: Vec<&str> = children[idx + 1..]
                            .iter()
                            .map(|c| c.label())
                            .collect();
                        if !skipped.is_empty() {
                            warn!(
                                composite = node.label(),
                                ?skipped,
                                "step failed; not starting the rest of the sequence"
                            );
                        }
                        break;
                    }
                }
                report
            }
            TaskNode::Parallel { children, .. } => {
                let reports = join_all(children.iter().map(execute)).await;
                reports.into_iter().fold(RunReport::default(), |mut acc, r| {
                    acc.merge(r);
                    acc
                })
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::Settings;
    use crate::dag::{parallel, sequence};
    use crate::task::Task;
    use crate::types::Feature;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recording(name: &'static str, log: &Log, fail: bool) -> TaskNode {
        let log = Arc::clone(log);
        Task::new(name, Feature::Copy, Settings::default(), move || {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(name.to_string());
                if fail {
                    anyhow::bail!("{name} failed");
                }
                Ok::<(), anyhow::Error>(())
            }
        })
        .into()
    }

    #[tokio::test]
    async fn sequence_stops_at_first_failure() {
        let log = Log::default();
        let node = sequence([
            recording("a", &log, false),
            recording("b", &log, true),
            recording("c", &log, false),
        ]);

        let report = execute(&node).await;

        assert_eq!(*log.lock().unwrap(), ["a", "b"]);
        assert_eq!(report.failed_tasks(), ["b"]);
        assert!(report.outcome_of("c").is_none());
    }

    #[tokio::test]
    async fn parallel_runs_every_child_once_despite_failure() {
        let log = Log::default();
        let node = parallel([
            recording("a", &log, true),
            recording("b", &log, false),
            recording("c", &log, false),
        ]);

        let report = execute(&node).await;

        let mut ran = log.lock().unwrap().clone();
        ran.sort();
        assert_eq!(ran, ["a", "b", "c"]);
        assert!(!report.is_success());
        assert_eq!(report.count("b"), 1);
    }

    #[tokio::test]
    async fn skipped_tasks_let_sequences_continue() {
        let log = Log::default();
        let settings = Settings::default().with(Feature::Clean, false);
        let skipped: TaskNode = Task::new("clean", Feature::Clean, settings, || async {
            Err::<(), _>(anyhow::anyhow!("should not run"))
        })
        .into();
        let node = sequence([skipped, recording("after", &log, false)]);

        let report = execute(&node).await;

        assert!(report.is_success());
        assert_eq!(report.outcome_of("clean"), Some(&TaskOutcome::Skipped));
        assert_eq!(*log.lock().unwrap(), ["after"]);
    }
}
