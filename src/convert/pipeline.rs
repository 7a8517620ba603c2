// src/convert/pipeline.rs

//! Explicit per-file step pipeline.
//!
//! Scripts go through
//! `banner → optimize → write → rename(.min) → minify → optimize → banner → write`,
//! stylesheets get a `prefix` step in front and skip the second optimize.
//! Every input yields an unminified file and a `.min` twin, both stamped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::banner::Banner;
use crate::fs::write_output;

/// In-flight file: a name relative to the output directory plus its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(file_name: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }
}

/// A single pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Banner,
    Optimize,
    Prefix,
    Write,
    Rename { suffix: &'static str },
    Minify,
}

pub const SCRIPT_STEPS: [Step; 8] = [
    Step::Banner,
    Step::Optimize,
    Step::Write,
    Step::Rename { suffix: ".min" },
    Step::Minify,
    Step::Optimize,
    Step::Banner,
    Step::Write,
];

pub const STYLE_STEPS: [Step; 8] = [
    Step::Prefix,
    Step::Banner,
    Step::Optimize,
    Step::Write,
    Step::Rename { suffix: ".min" },
    Step::Minify,
    Step::Banner,
    Step::Write,
];

/// Source minifier used by [`Step::Minify`].
pub trait Minify: Send + Sync {
    fn minify(&self, source: &str) -> Result<String>;
}

/// Vendor prefixer used by [`Step::Prefix`].
pub trait Prefix: Send + Sync {
    fn prefix(&self, source: &str) -> Result<String>;
}

/// Ordered steps bound to a banner, output directory and tools.
pub struct Pipeline<'a> {
    banner: &'a Banner,
    output_dir: &'a Path,
    minifier: &'a dyn Minify,
    prefixer: Option<&'a dyn Prefix>,
    steps: Vec<Step>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        banner: &'a Banner,
        output_dir: &'a Path,
        minifier: &'a dyn Minify,
        steps: impl Into<Vec<Step>>,
    ) -> Self {
        Self {
            banner,
            output_dir,
            minifier,
            prefixer: None,
            steps: steps.into(),
        }
    }

    /// The standard script pipeline.
    pub fn script(banner: &'a Banner, output_dir: &'a Path, minifier: &'a dyn Minify) -> Self {
        Self::new(banner, output_dir, minifier, SCRIPT_STEPS)
    }

    /// The standard stylesheet pipeline; `tools` both prefixes and minifies.
    pub fn style<T: Minify + Prefix>(
        banner: &'a Banner,
        output_dir: &'a Path,
        tools: &'a T,
    ) -> Self {
        Self::new(banner, output_dir, tools, STYLE_STEPS).with_prefixer(tools)
    }

    pub fn with_prefixer(mut self, prefixer: &'a dyn Prefix) -> Self {
        self.prefixer = Some(prefixer);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Push `artifact` through every step; returns the paths written.
    pub fn run(&self, artifact: Artifact) -> Result<Vec<PathBuf>> {
        let mut current = artifact;
        let mut written = Vec::new();

        for step in &self.steps {
            match *step {
                Step::Banner => current.contents = self.banner.stamp(&current.contents),
                Step::Optimize => current.contents = optimize(&current.contents),
                Step::Prefix => {
                    let prefixer = self
                        .prefixer
                        .ok_or_else(|| anyhow!("pipeline has a prefix step but no prefixer"))?;
                    current.contents = prefixer
                        .prefix(&current.contents)
                        .with_context(|| format!("prefixing {}", current.file_name.display()))?;
                }
                Step::Write => {
                    let path = self.output_dir.join(&current.file_name);
                    write_output(&path, &current.contents)?;
                    written.push(path);
                }
                Step::Rename { suffix } => {
                    current.file_name = with_suffix(&current.file_name, suffix);
                }
                Step::Minify => {
                    current.contents = self
                        .minifier
                        .minify(self.banner.strip(&current.contents))
                        .with_context(|| format!("minifying {}", current.file_name.display()))?;
                }
            }
        }

        Ok(written)
    }
}

/// Normalise line endings, strip trailing whitespace, and end with exactly
/// one newline.
pub fn optimize(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// Insert `suffix` before the extension: `app.js` + `.min` → `app.min.js`.
pub fn with_suffix(file_name: &Path, suffix: &str) -> PathBuf {
    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match file_name.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    file_name.with_file_name(name)
}
