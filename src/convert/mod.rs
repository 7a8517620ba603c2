// src/convert/mod.rs

//! Converter adapters: one stateless transformation per asset class.
//!
//! Every converter takes the same [`ConvertRequest`] (project root, input
//! globs, one output directory) and either writes its artifacts or fails.
//! The task registry wraps them all identically, so any converter can be
//! swapped for another behind the task contract.
//!
//! - [`pipeline`] holds the explicit per-file step list used for scripts
//!   and stylesheets.
//! - [`js`] and [`css`] wrap the JavaScript and CSS toolchains.
//! - [`scripts`] bundles, minifies and lints JavaScript.
//! - [`styles`] compiles Sass, then prefixes and minifies the CSS.
//! - [`svg`] optimizes SVGs and assembles the sprite.
//! - [`images`] recompresses raster images.
//! - [`copy`] copies static files verbatim.

pub mod copy;
pub mod css;
pub mod images;
pub mod js;
pub mod pipeline;
pub mod scripts;
pub mod styles;
pub mod svg;

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::path::PathBuf;

use anyhow::Result;

use crate::fs::{GlobEntry, expand, expand_files};

pub use copy::CopyConverter;
pub use images::ImagesConverter;
pub use css::CssProcessor;
pub use js::JsMinifier;
pub use pipeline::{Artifact, Minify, Pipeline, Prefix, Step};
pub use scripts::{Bundle, ScriptLinter, ScriptUnit, ScriptsConverter};
pub use styles::StylesConverter;
pub use svg::{SpriteConverter, SvgConverter};

/// Input globs plus a single output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    /// Project root the globs are relative to.
    pub root: PathBuf,
    pub inputs: Vec<String>,
    /// Absolute output directory.
    pub output: PathBuf,
}

impl ConvertRequest {
    pub fn new(root: impl Into<PathBuf>, inputs: Vec<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            inputs,
            output: output.into(),
        }
    }

    /// Every file matched by any input glob, de-duplicated, in glob order.
    pub fn files(&self) -> Result<Vec<GlobEntry>> {
        self.collect(expand_files)
    }

    /// Every entry (files and directories) matched by any input glob.
    pub fn entries(&self) -> Result<Vec<GlobEntry>> {
        self.collect(expand)
    }

    fn collect(
        &self,
        expander: fn(&std::path::Path, &str) -> Result<Vec<GlobEntry>>,
    ) -> Result<Vec<GlobEntry>> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for pattern in &self.inputs {
            for entry in expander(&self.root, pattern)? {
                if seen.insert(entry.path.clone()) {
                    out.push(entry);
                }
            }
        }
        Ok(out)
    }
}

/// A stateless transformation for one asset class.
pub trait Converter: Send + Sync + Debug {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Produce this converter's artifacts and return the written paths.
    fn convert(&self, request: &ConvertRequest) -> Result<Vec<PathBuf>>;
}
