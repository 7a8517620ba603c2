// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::{BuildConfig, RawConfigFile};
use crate::config::project::load_package_json;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// The project root is the directory containing the config file. When the
/// file has no `[project]` section, metadata is read from `package.json` next
/// to it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BuildConfig> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    validate_in_root(raw, config_root_dir(path))
}

/// Like [`load_and_validate`], but a missing file at the *default* location
/// falls back to the built-in layout rooted at the current directory.
pub fn load_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<BuildConfig> {
    let path = path.as_ref();
    if !explicit && !path.exists() {
        info!(
            path = %path.display(),
            "no config file found; using built-in defaults"
        );
        return validate_in_root(RawConfigFile::default(), config_root_dir(path));
    }
    load_and_validate(path)
}

fn validate_in_root(raw: RawConfigFile, root: PathBuf) -> Result<BuildConfig> {
    let fallback = if raw.project.is_none() {
        load_package_json(&root)?
    } else {
        None
    };
    BuildConfig::validate(raw, root, fallback)
}

/// Resolve the default config path: `Assetdag.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Assetdag.toml")
}

/// Figure out the project root for a config path.
///
/// - If the config path has a non-empty parent (e.g. "site/Assetdag.toml"),
///   we use that directory.
/// - If it's just a bare filename (parent = ""), we fall back to the current
///   working directory.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
