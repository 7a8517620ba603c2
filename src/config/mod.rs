// src/config/mod.rs

//! Configuration loading and validation for assetdag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Read banner metadata from `[project]` or `package.json` (`project.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate path layout and globs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod project;
pub mod validate;

pub use loader::{config_root_dir, default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    AssetPaths, BuildConfig, PathsSection, RawConfigFile, ScriptPaths, ServerSection, Settings,
};
pub use project::ProjectMeta;
