// src/fs/mod.rs

//! Glob expansion and output-writing primitives shared by the converters.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobMatcher};
use tracing::debug;
use walkdir::WalkDir;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// One file-system entry matched by a glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobEntry {
    /// Absolute (root-joined) path of the entry.
    pub path: PathBuf,
    /// Path relative to the glob base; preserved under the output directory.
    pub rel: PathBuf,
    pub is_dir: bool,
}

/// Parse a glob where `*` and `?` never cross a `/`, but `**` does.
pub fn build_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(strip_dot_slash(pattern))
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))
}

pub fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    Ok(build_glob(pattern)?.compile_matcher())
}

/// Leading path segments of `pattern` that contain no glob metacharacters.
///
/// `src/js/*` → `src/js`, `src/sass/**/*.scss` → `src/sass`. A pattern without
/// any metacharacter names a single file, so its base is the parent directory.
pub fn glob_base(pattern: &str) -> PathBuf {
    let pattern = strip_dot_slash(pattern);
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let literal = segments
        .iter()
        .take_while(|seg| !seg.contains(GLOB_META))
        .count();

    let take = if literal == segments.len() {
        literal.saturating_sub(1)
    } else {
        literal
    };
    segments[..take].iter().collect()
}

/// Expand `pattern` (relative to `root`) into matching entries, sorted by
/// their path relative to the glob base.
pub fn expand(root: &Path, pattern: &str) -> Result<Vec<GlobEntry>> {
    let matcher = compile_glob(pattern)?;
    let base = root.join(glob_base(pattern));

    if !base.is_dir() {
        debug!(base = %base.display(), pattern, "glob base does not exist; nothing matched");
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&base).min_depth(1);
    if let Some(depth) = max_depth(pattern) {
        walker = walker.max_depth(depth);
    }

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", base.display()))?;
        let Ok(rel_root) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !matcher.is_match(to_slash(rel_root)) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(&base)
            .unwrap_or(rel_root)
            .to_path_buf();
        entries.push(GlobEntry {
            path: entry.path().to_path_buf(),
            rel,
            is_dir: entry.file_type().is_dir(),
        });
    }

    entries.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(entries)
}

/// Only files from [`expand`].
pub fn expand_files(root: &Path, pattern: &str) -> Result<Vec<GlobEntry>> {
    Ok(expand(root, pattern)?
        .into_iter()
        .filter(|e| !e.is_dir)
        .collect())
}

/// Write `contents` to `path`, creating parent directories first.
pub fn write_output(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating dir {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), "wrote output file");
    Ok(())
}

/// Copy `from` to `to`, creating parent directories first.
pub fn copy_output(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating dir {}", parent.display()))?;
    }
    fs::copy(from, to)
        .with_context(|| format!("copying {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// Remove `dir` and everything below it (if present), then recreate it empty.
pub fn clean_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("removing {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("creating dir {}", dir.display()))?;
    Ok(())
}

/// Forward-slash form of a relative path, for glob matching.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn strip_dot_slash(pattern: &str) -> &str {
    pattern.strip_prefix("./").unwrap_or(pattern)
}

/// Walk depth needed below the glob base, or `None` for `**` patterns.
fn max_depth(pattern: &str) -> Option<usize> {
    if pattern.contains("**") {
        return None;
    }
    let total = strip_dot_slash(pattern)
        .split('/')
        .filter(|s| !s.is_empty())
        .count();
    let base = glob_base(pattern).components().count();
    Some(total.saturating_sub(base).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_stops_at_first_glob_segment() {
        assert_eq!(glob_base("src/js/*"), PathBuf::from("src/js"));
        assert_eq!(glob_base("./src/sass/**/*.{scss,sass}"), PathBuf::from("src/sass"));
        assert_eq!(glob_base("src/copy/robots.txt"), PathBuf::from("src/copy"));
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let m = compile_glob("src/js/*").unwrap();
        assert!(m.is_match("src/js/app.js"));
        assert!(m.is_match("src/js/main"));
        assert!(!m.is_match("src/js/main/nav.js"));

        let deep = compile_glob("src/js/**/*.js").unwrap();
        assert!(deep.is_match("src/js/main/nav.js"));
        assert!(deep.is_match("src/js/app.js"));
    }

    #[test]
    fn expand_preserves_layout_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_output(&root.join("src/copy/robots.txt"), "x").unwrap();
        write_output(&root.join("src/copy/fonts/a.woff"), "y").unwrap();

        let files = expand_files(root, "src/copy/**/*").unwrap();
        let rels: Vec<_> = files.iter().map(|e| e.rel.clone()).collect();
        assert_eq!(
            rels,
            vec![PathBuf::from("fonts/a.woff"), PathBuf::from("robots.txt")]
        );
    }

    #[test]
    fn expand_of_missing_base_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(expand(dir.path(), "src/img/**/*.png").unwrap().is_empty());
    }

    #[test]
    fn clean_dir_removes_stale_content() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        write_output(&out.join("stale.txt"), "old").unwrap();

        clean_dir(&out).unwrap();

        assert!(out.is_dir());
        assert!(!out.join("stale.txt").exists());
    }
}
