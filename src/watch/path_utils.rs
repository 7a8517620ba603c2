// src/watch/path_utils.rs

use std::path::{Component, Path};

use crate::fs::to_slash;

/// `path` relative to `root`, slash-separated, or `None` if it lies outside.
///
/// Event paths may come back canonicalized (e.g. `/private/var/...` on
/// macOS) while `root` is not, so a failed prefix strip is retried on
/// canonical forms. A removed file cannot be canonicalized; its parent is
/// used instead.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    let root = root.canonicalize().ok()?;
    let path = match path.canonicalize() {
        Ok(p) => p,
        Err(_) => path.parent()?.canonicalize().ok()?.join(path.file_name()?),
    };
    path.strip_prefix(&root).ok().map(to_slash)
}

/// Whether any component of `rel` is hidden (starts with `.`), e.g. editor
/// swap files or `.git/` internals.
pub fn is_hidden(rel: &str) -> bool {
    Path::new(rel).components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_prefix_is_stripped() {
        assert_eq!(
            relative_str(Path::new("/p"), Path::new("/p/src/js/a.js")).as_deref(),
            Some("src/js/a.js")
        );
    }

    #[test]
    fn removed_file_resolves_through_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        let canonical_root = dir.path().canonicalize().unwrap();
        let gone = canonical_root.join("src").join("gone.scss");

        let rel = relative_str(dir.path(), &gone);
        assert_eq!(rel.as_deref(), Some("src/gone.scss"));
    }

    #[test]
    fn hidden_components_are_detected() {
        assert!(is_hidden(".git/index"));
        assert!(is_hidden("src/sass/.main.scss.swp"));
        assert!(!is_hidden("src/sass/main.scss"));
    }
}
