// src/dag/composites.rs

//! Named composites exposed on the command line.

use crate::dag::{TaskNode, parallel, sequence};
use crate::errors::{AssetdagError, Result};
use crate::task::TaskRegistry;

pub const DEFAULT: &str = "default";
pub const SCRIPTS: &str = "scripts";
pub const STYLES: &str = "styles";
pub const ASSETS: &str = "assets";
pub const COPY: &str = "copy";
pub const COPY_LIBS: &str = "copy-libs";
pub const WATCH: &str = "watch";

/// Every composite name, in the order `--dry-run` lists them.
pub const NAMES: [&str; 7] = [DEFAULT, SCRIPTS, STYLES, ASSETS, COPY, COPY_LIBS, WATCH];

/// The composite trees of a build. Each primitive is built once and shared
/// by every composite that mentions it.
#[derive(Debug, Clone)]
pub struct Composites {
    default: TaskNode,
    scripts: TaskNode,
    styles: TaskNode,
    assets: TaskNode,
    copy: TaskNode,
    copy_libs: TaskNode,
    watch: TaskNode,
    notify: TaskNode,
}

impl Composites {
    pub fn from_registry(registry: &TaskRegistry) -> Self {
        let clean: TaskNode = registry.clean().into();
        let scripts_build: TaskNode = registry.scripts_build().into();
        let scripts_lint: TaskNode = registry.scripts_lint().into();
        let styles_build: TaskNode = registry.styles_build().into();
        let svgs_optimize: TaskNode = registry.svgs_optimize().into();
        let svgs_sprite: TaskNode = registry.svgs_sprite().into();
        let images_optimize: TaskNode = registry.images_optimize().into();
        let copy_files: TaskNode = registry.copy_files().into();
        let copy_libs: TaskNode = registry.copy_libs().into();
        let reload_start: TaskNode = registry.reload_start().into();
        let reload_notify: TaskNode = registry.reload_notify().into();

        let default = sequence([
            clean,
            parallel([
                scripts_build.clone(),
                scripts_lint.clone(),
                styles_build.clone(),
                svgs_optimize.clone(),
                svgs_sprite.clone(),
                images_optimize.clone(),
                copy_files.clone(),
                copy_libs.clone(),
            ]),
        ])
        .named(DEFAULT);

        let watch = sequence([default.clone(), reload_start]).named(WATCH);

        Self {
            scripts: parallel([scripts_build, scripts_lint]).named(SCRIPTS),
            styles: parallel([styles_build]).named(STYLES),
            assets: sequence([svgs_optimize, svgs_sprite, images_optimize]).named(ASSETS),
            copy: parallel([copy_files]).named(COPY),
            copy_libs: parallel([copy_libs]).named(COPY_LIBS),
            default,
            watch,
            notify: reload_notify,
        }
    }

    pub fn get(&self, name: &str) -> Option<&TaskNode> {
        match name {
            DEFAULT => Some(&self.default),
            SCRIPTS => Some(&self.scripts),
            STYLES => Some(&self.styles),
            ASSETS => Some(&self.assets),
            COPY => Some(&self.copy),
            COPY_LIBS => Some(&self.copy_libs),
            WATCH => Some(&self.watch),
            _ => None,
        }
    }

    /// Like [`Composites::get`], but an unknown name is an error.
    pub fn require(&self, name: &str) -> Result<&TaskNode> {
        self.get(name)
            .ok_or_else(|| AssetdagError::UnknownComposite(name.to_string()))
    }

    /// `target` followed by a reload notification. Used for watch bindings,
    /// so browsers only reload after the rebuild succeeded.
    pub fn with_reload(&self, target: &str) -> Result<TaskNode> {
        let node = self.require(target)?.clone();
        Ok(sequence([node, self.notify.clone()]).named(format!("{target}+reload")))
    }
}
