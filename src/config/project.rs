// src/config/project.rs

//! Project metadata used to stamp banners onto generated artifacts.
//!
//! The metadata comes from `[project]` in `Assetdag.toml` or, failing that,
//! from the `package.json` in the project root.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{AssetdagError, Result};

pub const PACKAGE_JSON: &str = "package.json";

/// Name, version, author, license and repository URL of the project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    pub version: String,
    pub author: String,
    pub license: String,
    pub repository: String,
}

/// Read project metadata from `<root>/package.json`.
///
/// Returns `Ok(None)` when the file does not exist. `author` may be a plain
/// string or an object with a `name`; `repository` may be a plain string or
/// an object with a `url`.
pub fn load_package_json(root: &Path) -> Result<Option<ProjectMeta>> {
    let path = root.join(PACKAGE_JSON);
    if !path.is_file() {
        debug!(path = %path.display(), "no package.json found");
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let json: Value = serde_json::from_str(&contents)?;
    parse_package_json(&json).map(Some)
}

fn parse_package_json(json: &Value) -> Result<ProjectMeta> {
    Ok(ProjectMeta {
        name: required_str(json, "name")?,
        version: required_str(json, "version")?,
        author: nested_str(json, "author", "name")?,
        license: required_str(json, "license")?,
        repository: nested_str(json, "repository", "url")?,
    })
}

fn required_str(json: &Value, key: &str) -> Result<String> {
    json.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(key))
}

/// A field that is either `"value"` or `{ "<inner>": "value" }`.
fn nested_str(json: &Value, key: &str, inner: &str) -> Result<String> {
    match json.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Object(obj)) => obj
            .get(inner)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| missing(&format!("{key}.{inner}"))),
        _ => Err(missing(key)),
    }
}

fn missing(key: &str) -> AssetdagError {
    AssetdagError::ConfigError(format!("package.json is missing string field `{key}`"))
}
