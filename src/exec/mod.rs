// src/exec/mod.rs

//! Run execution layer.
//!
//! - [`executor_loop`] owns the background loop that receives scheduled
//!   runs and spawns each on its own Tokio task.
//! - [`runner`] executes a single run and reports back with
//!   `RuntimeEvent::RunCompleted`.
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `RealExecutorBackend`; tests substitute a fake.

pub mod backend;
pub mod executor_loop;
pub mod runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use executor_loop::spawn_executor;
