// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::TaskName;

#[derive(Error, Debug)]
pub enum AssetdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    GlobError(#[from] globset::Error),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("Unknown composite task: {0}")]
    UnknownComposite(String),

    #[error("Unknown task: {name} (known: {})", .known.join(", "))]
    UnknownTask { name: String, known: Vec<&'static str> },

    #[error("Build failed; failed tasks: {}", .failed.join(", "))]
    BuildFailed { failed: Vec<TaskName> },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AssetdagError>;
