// src/watch/binding.rs

use crate::config::BuildConfig;
use crate::dag::{Composites, TaskNode, composites};
use crate::errors::Result;
use crate::types::BindingName;

/// A set of globs and the node to run when any of them sees a change.
#[derive(Debug, Clone)]
pub struct WatchBinding {
    pub name: BindingName,
    pub globs: Vec<String>,
    pub node: TaskNode,
}

impl WatchBinding {
    pub fn new(name: impl Into<BindingName>, globs: Vec<String>, node: TaskNode) -> Self {
        Self {
            name: name.into(),
            globs,
            node,
        }
    }
}

/// The stock bindings: each source class rebuilds its composite, then asks
/// the browser to reload.
pub fn default_bindings(cfg: &BuildConfig, composites: &Composites) -> Result<Vec<WatchBinding>> {
    let paths = cfg.paths();
    let table = [
        ("scripts", vec![paths.scripts.watch.clone()], composites::SCRIPTS),
        ("libs", vec![paths.libs.input.clone()], composites::COPY_LIBS),
        ("styles", vec![paths.styles.input.clone()], composites::STYLES),
        (
            "assets",
            vec![paths.svgs.input.clone(), paths.images.input.clone()],
            composites::ASSETS,
        ),
        ("copy", vec![paths.copy.input.clone()], composites::COPY),
    ];

    table
        .into_iter()
        .map(|(name, globs, target)| -> Result<WatchBinding> {
            Ok(WatchBinding::new(name, globs, composites.with_reload(target)?))
        })
        .collect()
}
