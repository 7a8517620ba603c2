// src/task/mod.rs

//! Primitive build tasks.
//!
//! A [`Task`] is a named unit of work guarded by exactly one feature toggle.
//! When the toggle is off the task completes as [`TaskOutcome::Skipped`]
//! without touching the filesystem; when it is on, its [`TaskWork`] runs and
//! any error becomes [`TaskOutcome::Failed`].

pub mod registry;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::Settings;
use crate::types::{Feature, TaskName, TaskOutcome};

pub use registry::TaskRegistry;

/// The body of a task: an async action producing `Ok(())` or an error.
pub trait TaskWork: Send + Sync {
    fn run(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>>;
}

impl<F, Fut> TaskWork for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn run(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        Box::pin(self())
    }
}

/// A feature-gated primitive task.
#[derive(Clone)]
pub struct Task {
    name: TaskName,
    feature: Feature,
    settings: Settings,
    work: Arc<dyn TaskWork>,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

impl Task {
    pub fn new(
        name: impl Into<TaskName>,
        feature: Feature,
        settings: Settings,
        work: impl TaskWork + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            feature,
            settings,
            work: Arc::new(work),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_enabled(self.feature)
    }

    /// Run the task once. Never panics on task errors; they are folded into
    /// the outcome.
    pub async fn run(&self) -> TaskOutcome {
        if !self.is_enabled() {
            debug!(task = %self.name, feature = %self.feature, "feature disabled; skipping");
            return TaskOutcome::Skipped;
        }

        info!(task = %self.name, "starting task");
        let started = Instant::now();

        match self.work.run().await {
            Ok(()) => {
                info!(
                    task = %self.name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "task finished"
                );
                TaskOutcome::Success
            }
            Err(err) => {
                error!(
                    task = %self.name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %format!("{err:#}"),
                    "task failed"
                );
                TaskOutcome::Failed(format!("{err:#}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_task(settings: Settings, hits: Arc<AtomicUsize>) -> Task {
        Task::new("styles:build", Feature::Styles, settings, move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok::<(), anyhow::Error>(())
            }
        })
    }

    #[tokio::test]
    async fn disabled_feature_skips_without_running_work() {
        let hits = Arc::new(AtomicUsize::new(0));
        let settings = Settings::default().with(Feature::Styles, false);
        let task = counting_task(settings, Arc::clone(&hits));

        assert_eq!(task.run().await, TaskOutcome::Skipped);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn enabled_feature_runs_work() {
        let hits = Arc::new(AtomicUsize::new(0));
        let task = counting_task(Settings::default(), Arc::clone(&hits));

        assert_eq!(task.run().await, TaskOutcome::Success);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn work_error_becomes_failed_outcome() {
        let task = Task::new("clean", Feature::Clean, Settings::default(), || async {
            Err::<(), _>(anyhow::anyhow!("disk on fire"))
        });

        match task.run().await {
            TaskOutcome::Failed(msg) => assert!(msg.contains("disk on fire")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
