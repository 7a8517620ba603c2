// src/config/validate.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Datelike;
use globset::Glob;
use tracing::warn;

use crate::banner::Banner;
use crate::config::model::{BuildConfig, RawConfigFile, normalize_rel};
use crate::config::project::ProjectMeta;
use crate::errors::{AssetdagError, Result};

impl BuildConfig {
    /// Validate a raw config and freeze it into a [`BuildConfig`].
    ///
    /// `project` is the metadata to use when the raw file has no `[project]`
    /// section (typically read from `package.json`).
    pub fn validate(
        raw: RawConfigFile,
        root: PathBuf,
        fallback_project: Option<ProjectMeta>,
    ) -> Result<Self> {
        validate_globs(&raw)?;
        validate_scripts(&raw)?;
        validate_output_layout(&raw)?;
        validate_server(&raw)?;

        let project = raw.project.or(fallback_project).ok_or_else(|| {
            AssetdagError::ConfigError(
                "no project metadata: add a [project] section or a package.json".to_string(),
            )
        })?;

        let banner = Banner::new(&project, chrono::Local::now().year());

        Ok(BuildConfig::new_unchecked(
            root,
            raw.settings,
            raw.paths,
            project,
            banner,
            raw.server,
        ))
    }
}

fn validate_globs(cfg: &RawConfigFile) -> Result<()> {
    for (label, pattern) in cfg.paths.globs() {
        if pattern.trim().is_empty() {
            return Err(AssetdagError::ConfigError(format!(
                "{label} must not be empty"
            )));
        }
        Glob::new(pattern)?;
    }
    Ok(())
}

fn validate_scripts(cfg: &RawConfigFile) -> Result<()> {
    if cfg.paths.scripts.polyfills.trim().is_empty() {
        return Err(AssetdagError::ConfigError(
            "paths.scripts.polyfills must be a non-empty file suffix".to_string(),
        ));
    }
    Ok(())
}

/// The output root is wiped by `clean`, so it must be a real subdirectory
/// that does not contain the sources, and every asset class must write
/// inside it.
fn validate_output_layout(cfg: &RawConfigFile) -> Result<()> {
    let output = normalize_rel(&cfg.paths.output);
    let input = normalize_rel(&cfg.paths.input);

    if output.as_os_str().is_empty() || output.is_absolute() {
        return Err(AssetdagError::ConfigError(format!(
            "paths.output must be a relative subdirectory of the project (got {:?})",
            cfg.paths.output
        )));
    }
    if input.starts_with(&output) {
        return Err(AssetdagError::ConfigError(format!(
            "paths.output ({:?}) must not contain paths.input ({:?})",
            cfg.paths.output, cfg.paths.input
        )));
    }

    let mut by_dir: BTreeMap<PathBuf, Vec<&str>> = BTreeMap::new();
    for (class, dir) in cfg.paths.asset_outputs() {
        let dir = normalize_rel(dir);
        if !dir.starts_with(&output) {
            return Err(AssetdagError::ConfigError(format!(
                "paths.{class}.output ({}) is outside paths.output ({})",
                dir.display(),
                output.display()
            )));
        }
        by_dir.entry(dir).or_default().push(class);
    }

    for (dir, classes) in by_dir.iter().filter(|(_, c)| c.len() > 1) {
        warn!(
            dir = %dir.display(),
            ?classes,
            "several asset classes share one output directory; their file names must not collide"
        );
    }

    Ok(())
}

fn validate_server(cfg: &RawConfigFile) -> Result<()> {
    if cfg.server.port == 0 {
        return Err(AssetdagError::ConfigError(
            "[server].port must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::AssetPaths;

    fn project() -> ProjectMeta {
        ProjectMeta {
            name: "site".into(),
            version: "1.0.0".into(),
            author: "Jane".into(),
            license: "MIT".into(),
            repository: "https://example.com".into(),
        }
    }

    #[test]
    fn defaults_validate_with_fallback_project() {
        let cfg = BuildConfig::validate(RawConfigFile::default(), PathBuf::from("/p"), Some(project()))
            .unwrap();
        assert_eq!(cfg.output_dir(), PathBuf::from("/p/dist/"));
        assert!(cfg.banner().text().starts_with("/*! site v1.0.0 | (c) "));
    }

    #[test]
    fn missing_project_is_rejected() {
        let err = BuildConfig::validate(RawConfigFile::default(), PathBuf::from("/p"), None)
            .unwrap_err();
        assert!(matches!(err, AssetdagError::ConfigError(m) if m.contains("project metadata")));
    }

    #[test]
    fn asset_output_outside_root_output_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.paths.styles = AssetPaths::new("src/sass/*.scss", "public/css/");
        let err = BuildConfig::validate(raw, PathBuf::from("/p"), Some(project())).unwrap_err();
        assert!(matches!(err, AssetdagError::ConfigError(m) if m.contains("paths.styles.output")));
    }

    #[test]
    fn output_containing_sources_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.paths.output = "./".to_string();
        assert!(BuildConfig::validate(raw, PathBuf::from("/p"), Some(project())).is_err());
    }

    #[test]
    fn invalid_glob_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.paths.copy = AssetPaths::new("src/copy/[", "dist/");
        let err = BuildConfig::validate(raw, PathBuf::from("/p"), Some(project())).unwrap_err();
        assert!(matches!(err, AssetdagError::GlobError(_)));
    }
}
