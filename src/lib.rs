// src/lib.rs

pub mod banner;
pub mod cli;
pub mod config;
pub mod convert;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod reload;
pub mod task;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cli::{CliArgs, Command};
use crate::config::{BuildConfig, default_config_path, load_or_default};
use crate::dag::{Composites, ExecutionGraph, TaskNode, composites};
use crate::engine::{RunReport, Runtime, RuntimeEvent, RuntimeOptions, WatchCore, execute};
use crate::errors::{AssetdagError, Result};
use crate::exec::RealExecutorBackend;
use crate::reload::{LiveReloadServer, ReloadSession};
use crate::task::TaskRegistry;
use crate::task::registry::PRIMITIVES;
use crate::types::{Feature, TaskOutcome};
use crate::watch::{WatchBinding, default_bindings, spawn_watcher};

/// Everything a build needs, assembled once per process.
#[derive(Debug, Clone)]
pub struct Build {
    pub config: Arc<BuildConfig>,
    pub session: Arc<ReloadSession>,
    pub composites: Composites,
}

impl Build {
    /// Wire the registry and composites around `config`, using the
    /// production live-reload server.
    pub fn new(config: BuildConfig) -> Self {
        let server = LiveReloadServer::new(&config.server().host, config.server().port);
        Self::with_session(config, Arc::new(ReloadSession::new(Arc::new(server))))
    }

    pub fn with_session(config: BuildConfig, session: Arc<ReloadSession>) -> Self {
        let config = Arc::new(config);
        let registry = TaskRegistry::new(Arc::clone(&config), Arc::clone(&session));
        let composites = Composites::from_registry(&registry);
        Self {
            config,
            session,
            composites,
        }
    }

    /// Run the named composite once and report every primitive's outcome.
    pub async fn run_composite(&self, name: &str) -> Result<RunReport> {
        let node = self.composites.require(name)?;
        info!(composite = name, "running composite");
        let report = execute(node).await;
        log_report(name, &report);
        Ok(report)
    }

    /// Like [`Build::run_composite`], but any failed primitive is an error.
    pub async fn build(&self, name: &str) -> Result<RunReport> {
        let report = self.run_composite(name).await?;
        into_result(report)
    }

    /// Run one primitive on its own, ignoring the composites around it.
    /// A failed primitive is an error.
    pub async fn run_task(&self, name: &str) -> Result<RunReport> {
        let node = self.task_node(name)?;
        info!(task = name, "running task");
        let report = execute(&node).await;
        log_report(name, &report);
        into_result(report)
    }

    fn task_node(&self, name: &str) -> Result<TaskNode> {
        let registry = TaskRegistry::new(Arc::clone(&self.config), Arc::clone(&self.session));
        registry
            .task(name)
            .map(TaskNode::from)
            .ok_or_else(|| AssetdagError::UnknownTask {
                name: name.to_string(),
                known: PRIMITIVES.to_vec(),
            })
    }

    pub fn bindings(&self) -> Result<Vec<WatchBinding>> {
        default_bindings(&self.config, &self.composites)
    }
}

/// High-level entry point used by `main.rs`.
///
/// Loads the config, then either prints a dry run, runs one composite, or
/// enters watch mode.
pub async fn run(args: CliArgs) -> Result<()> {
    let explicit = args.config.is_some();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_or_default(&config_path, explicit)?.with_disabled(&args.disable);
    let command = args.command.unwrap_or_default();

    let build = Build::new(cfg);

    if args.dry_run {
        return print_dry_run(&build, &command);
    }

    match command {
        Command::Watch => watch(build).await,
        Command::Task { name } => build.run_task(&name).await.map(|_| ()),
        other => match other.composite() {
            Some(name) => build.build(name).await.map(|_| ()),
            None => Err(AssetdagError::UnknownComposite(format!("{other:?}"))),
        },
    }
}

fn into_result(report: RunReport) -> Result<RunReport> {
    if report.is_success() {
        Ok(report)
    } else {
        Err(AssetdagError::BuildFailed {
            failed: report.failed_tasks(),
        })
    }
}

/// Initial build + reload server, then rebuild on change until Ctrl-C.
///
/// Only a failing initial build is fatal; failed rebuilds are logged and
/// the bindings stay armed.
async fn watch(build: Build) -> Result<()> {
    build.build(composites::WATCH).await?;

    let bindings = build.bindings()?;
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let executor = RealExecutorBackend::new(rt_tx.clone());

    let _watcher = spawn_watcher(build.config.root(), &bindings, rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let core = WatchCore::new(
        bindings.into_iter().map(|b| (b.name, b.node)),
        RuntimeOptions::default(),
    );
    Runtime::new(core, rt_rx, executor).run().await
}

fn log_report(name: &str, report: &RunReport) {
    let skipped = report
        .tasks
        .iter()
        .filter(|t| t.outcome == TaskOutcome::Skipped)
        .count();
    if report.is_success() {
        info!(composite = name, tasks = report.tasks.len(), skipped, "composite finished");
    } else {
        for task in &report.tasks {
            if let TaskOutcome::Failed(reason) = &task.outcome {
                error!(task = %task.task, %reason, "task failed");
            }
        }
        error!(
            composite = name,
            failed = ?report.failed_tasks(),
            "composite failed"
        );
    }
}

/// Print the resolved settings, paths and execution stages of `command`.
fn print_dry_run(build: &Build, command: &Command) -> Result<()> {
    let cfg = &build.config;
    let (label, node) = match command {
        Command::Task { name } => (format!("task {name}"), build.task_node(name)?),
        other => {
            let name = other
                .composite()
                .ok_or_else(|| AssetdagError::UnknownComposite(format!("{other:?}")))?;
            (format!("composite {name}"), build.composites.require(name)?.clone())
        }
    };

    println!("assetdag dry-run");
    println!("  root = {}", cfg.root().display());
    println!("  output = {}", cfg.output_dir().display());
    println!("  banner = {}", cfg.banner().text().trim_end());
    println!();

    println!("settings:");
    for feature in Feature::ALL {
        let state = if cfg.settings().is_enabled(feature) { "on" } else { "off" };
        println!("  {:<10} {state}", feature.as_str());
    }
    println!();

    println!("{label}:");
    print!("{}", indent(&node.render()));
    println!();

    let graph = ExecutionGraph::from_node(&node);
    let stages = graph.stages()?;
    println!("stages:");
    for (idx, stage) in stages.iter().enumerate() {
        println!("  {}: {}", idx + 1, stage.join(", "));
    }

    println!();
    println!("waits on:");
    for task in stages.iter().flatten() {
        let deps = graph.dependencies_of(task);
        if !deps.is_empty() {
            println!("  {task} <- {}", deps.join(", "));
        }
    }

    if *command == Command::Watch {
        println!();
        println!("watch bindings:");
        for binding in build.bindings()? {
            println!("  {} <- {}", binding.name, binding.globs.join(", "));
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("  {l}\n")).collect()
}
