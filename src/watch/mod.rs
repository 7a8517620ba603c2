// src/watch/mod.rs

//! File watching.
//!
//! Compiles each binding's globs, runs a cross-platform watcher (`notify`)
//! over the project root, and turns changes into binding-level triggers for
//! the runtime. It knows nothing about what a binding runs.

pub mod binding;
pub mod event_handler;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use binding::{WatchBinding, default_bindings};
pub use patterns::{BindingPatterns, compile_bindings, matching_bindings};
pub use watcher::{WatcherHandle, spawn_watcher};
