// src/convert/scripts.rs

//! Script bundling and linting.
//!
//! Each top-level entry of the scripts input glob is a [`ScriptUnit`]:
//! a lone `.js` file is processed on its own, a directory is concatenated
//! into one or two bundles named after it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::banner::Banner;
use crate::convert::js::{JsMinifier, syntax_errors};
use crate::convert::pipeline::{Artifact, Pipeline};
use crate::convert::{ConvertRequest, Converter};
use crate::fs::to_slash;

/// Suffix inserted into the name of the all-files bundle when polyfills are
/// split out: `main.js` + `main.polyfills.js`.
pub const POLYFILLS_BUNDLE_SUFFIX: &str = ".polyfills";

/// One concatenation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptUnit {
    /// A script file at the top level of the input glob.
    Single { path: PathBuf, rel: PathBuf },
    /// A directory whose direct `*.js` children are bundled, in name order.
    Group { name: String, members: Vec<PathBuf> },
}

/// A named output produced from one or more source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub file_name: PathBuf,
    pub sources: Vec<PathBuf>,
}

impl ScriptUnit {
    /// Turn the entries matched by `request` into units.
    pub fn discover(request: &ConvertRequest) -> Result<Vec<ScriptUnit>> {
        let mut units = Vec::new();
        for entry in request.entries()? {
            if entry.is_dir {
                units.push(ScriptUnit::Group {
                    name: to_slash(&entry.rel),
                    members: direct_js_children(&entry.path)?,
                });
            } else if is_js(&entry.path) {
                units.push(ScriptUnit::Single {
                    path: entry.path,
                    rel: entry.rel,
                });
            } else {
                debug!(path = %entry.path.display(), "skipping non-script entry");
            }
        }
        Ok(units)
    }

    /// Every source file taking part in this unit.
    pub fn sources(&self) -> Vec<&Path> {
        match self {
            ScriptUnit::Single { path, .. } => vec![path.as_path()],
            ScriptUnit::Group { members, .. } => members.iter().map(PathBuf::as_path).collect(),
        }
    }

    /// Bundles this unit maps to.
    ///
    /// A group yields `<name>.js` with every member, or, with polyfill
    /// separation on, `<name>.js` without the polyfill files plus
    /// `<name>.polyfills.js` with all of them. Bundles with no sources are
    /// dropped.
    pub fn bundles(&self, separate_polyfills: bool, polyfill_suffix: &str) -> Vec<Bundle> {
        match self {
            ScriptUnit::Single { path, rel } => vec![Bundle {
                file_name: rel.clone(),
                sources: vec![path.clone()],
            }],
            ScriptUnit::Group { name, members } => {
                let mut bundles = Vec::with_capacity(2);
                let mut all_suffix = "";

                if separate_polyfills {
                    all_suffix = POLYFILLS_BUNDLE_SUFFIX;
                    let plain: Vec<PathBuf> = members
                        .iter()
                        .filter(|m| !is_polyfill(m, polyfill_suffix))
                        .cloned()
                        .collect();
                    bundles.push(Bundle {
                        file_name: PathBuf::from(format!("{name}.js")),
                        sources: plain,
                    });
                }

                bundles.push(Bundle {
                    file_name: PathBuf::from(format!("{name}{all_suffix}.js")),
                    sources: members.clone(),
                });

                bundles.retain(|b| !b.sources.is_empty());
                bundles
            }
        }
    }
}

/// Builds script bundles and their `.min` twins.
#[derive(Debug, Clone)]
pub struct ScriptsConverter {
    banner: Banner,
    separate_polyfills: bool,
    polyfill_suffix: String,
}

impl ScriptsConverter {
    pub fn new(banner: Banner, separate_polyfills: bool, polyfill_suffix: impl Into<String>) -> Self {
        Self {
            banner,
            separate_polyfills,
            polyfill_suffix: polyfill_suffix.into(),
        }
    }
}

impl Converter for ScriptsConverter {
    fn name(&self) -> &'static str {
        "scripts"
    }

    fn convert(&self, request: &ConvertRequest) -> Result<Vec<PathBuf>> {
        let minifier = JsMinifier;
        let pipeline = Pipeline::script(&self.banner, &request.output, &minifier);
        let mut written = Vec::new();

        for unit in ScriptUnit::discover(request)? {
            for bundle in unit.bundles(self.separate_polyfills, &self.polyfill_suffix) {
                debug!(
                    bundle = %bundle.file_name.display(),
                    sources = bundle.sources.len(),
                    "building script bundle"
                );
                let contents = concat(&bundle.sources)?;
                written.extend(pipeline.run(Artifact::new(bundle.file_name, contents))?);
            }
        }

        Ok(written)
    }
}

/// Syntax-checks every script; problems are reported as warnings, never
/// fatal. Only an unreadable source fails the task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLinter;

impl Converter for ScriptLinter {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn convert(&self, request: &ConvertRequest) -> Result<Vec<PathBuf>> {
        let mut checked = 0usize;
        let mut problems = 0usize;

        for unit in ScriptUnit::discover(request)? {
            for source in unit.sources() {
                checked += 1;
                let code = fs::read_to_string(source)
                    .with_context(|| format!("reading {}", source.display()))?;
                match syntax_errors(&code) {
                    Ok(errors) => {
                        for error in errors {
                            problems += 1;
                            warn!(file = %source.display(), %error, "script does not parse");
                        }
                    }
                    Err(err) => {
                        problems += 1;
                        warn!(file = %source.display(), error = %err, "script could not be linted");
                    }
                }
            }
        }

        info!(checked, problems, "script lint finished");
        Ok(Vec::new())
    }
}

/// Concatenate files with a newline between them.
fn concat(sources: &[PathBuf]) -> Result<String> {
    let parts = sources
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("reading {}", p.display())))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("\n"))
}

fn direct_js_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut members = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading dir {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && is_js(&path) {
            members.push(path);
        }
    }
    members.sort();
    Ok(members)
}

fn is_js(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "js")
}

fn is_polyfill(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
}
