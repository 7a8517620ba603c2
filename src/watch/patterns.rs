// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{GlobSet, GlobSetBuilder};

use crate::fs::build_glob;
use crate::types::BindingName;
use crate::watch::WatchBinding;

/// Compiled globs of one binding, matched against root-relative paths such
/// as `"src/sass/main.scss"`.
#[derive(Clone)]
pub struct BindingPatterns {
    name: BindingName,
    watch_set: GlobSet,
}

impl fmt::Debug for BindingPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingPatterns")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl BindingPatterns {
    pub fn compile(name: impl Into<BindingName>, globs: &[String]) -> Result<Self> {
        let name = name.into();
        let mut builder = GlobSetBuilder::new();
        for pattern in globs {
            builder.add(build_glob(pattern)?);
        }
        let watch_set = builder
            .build()
            .with_context(|| format!("building watch globset for binding {name}"))?;
        Ok(Self { name, watch_set })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.watch_set.is_match(rel_path.trim_start_matches("./"))
    }
}

pub fn compile_bindings(bindings: &[WatchBinding]) -> Result<Vec<BindingPatterns>> {
    bindings
        .iter()
        .map(|b| BindingPatterns::compile(b.name.clone(), &b.globs))
        .collect()
}

/// Names of every binding interested in `rel_path`, in binding order.
pub fn matching_bindings<'a>(patterns: &'a [BindingPatterns], rel_path: &str) -> Vec<&'a str> {
    patterns
        .iter()
        .filter(|p| p.matches(rel_path))
        .map(BindingPatterns::name)
        .collect()
}
