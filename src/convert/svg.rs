// src/convert/svg.rs

//! SVG optimization and sprite assembly.

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;

use crate::convert::{ConvertRequest, Converter};
use crate::fs::write_output;

pub const SPRITE_FILE_NAME: &str = "sprite.svg";

static XML_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\?xml[^>]*\?>").expect("valid regex"));
static DOCTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]*>").expect("valid regex"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<metadata\b.*?</metadata>").expect("valid regex"));
static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("valid regex"));
static SVG_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<svg\b([^>]*)>(.*)</svg>").expect("valid regex"));
static VIEW_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"viewBox\s*=\s*"([^"]*)""#).expect("valid regex"));

/// Strip the XML prolog, doctype, comments, metadata and inter-tag whitespace.
pub fn optimize_svg(source: &str) -> String {
    let s = XML_DECL.replace_all(source, "");
    let s = DOCTYPE.replace_all(&s, "");
    let s = COMMENT.replace_all(&s, "");
    let s = METADATA.replace_all(&s, "");
    let s = BETWEEN_TAGS.replace_all(&s, "><");
    s.trim().to_string()
}

/// Wrap an optimized SVG document as a `<symbol>` with the given id.
pub fn to_symbol(id: &str, svg: &str) -> Result<String> {
    let Some(caps) = SVG_ROOT.captures(svg) else {
        bail!("no <svg> root element");
    };
    let attrs = caps.get(1).map_or("", |m| m.as_str());
    let inner = caps.get(2).map_or("", |m| m.as_str());

    let view_box = VIEW_BOX
        .captures(attrs)
        .and_then(|c| c.get(1))
        .map(|m| format!(r#" viewBox="{}""#, m.as_str()))
        .unwrap_or_default();

    Ok(format!(r#"<symbol id="{id}"{view_box}>{inner}</symbol>"#))
}

/// Optimizes each SVG into the output directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgConverter;

impl Converter for SvgConverter {
    fn name(&self) -> &'static str {
        "svgs"
    }

    fn convert(&self, request: &ConvertRequest) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for entry in request.files()? {
            let source = fs::read_to_string(&entry.path)
                .with_context(|| format!("reading {}", entry.path.display()))?;
            let out = request.output.join(&entry.rel);
            write_output(&out, optimize_svg(&source))?;
            written.push(out);
        }
        Ok(written)
    }
}

/// Combines every SVG into one inline `sprite.svg` of `<symbol>`s keyed by
/// file stem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteConverter;

impl Converter for SpriteConverter {
    fn name(&self) -> &'static str {
        "sprite"
    }

    fn convert(&self, request: &ConvertRequest) -> Result<Vec<PathBuf>> {
        let files = request.files()?;
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let mut sprite = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg">"#);
        for entry in files {
            let id = entry
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let source = fs::read_to_string(&entry.path)
                .with_context(|| format!("reading {}", entry.path.display()))?;
            let symbol = to_symbol(&id, &optimize_svg(&source))
                .with_context(|| format!("adding {} to sprite", entry.path.display()))?;
            sprite.push_str(&symbol);
        }
        sprite.push_str("</svg>");

        let out = request.output.join(SPRITE_FILE_NAME);
        write_output(&out, sprite)?;
        Ok(vec![out])
    }
}
