// src/banner.rs

//! Header comment stamped onto generated scripts and stylesheets.

use crate::config::project::ProjectMeta;

/// Rendered banner text, including the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    text: String,
}

impl Banner {
    /// `/*! <name> v<version> | (c) <year> <author> | <license> License | <repo-url> */`
    pub fn new(meta: &ProjectMeta, year: i32) -> Self {
        let text = format!(
            "/*! {} v{} | (c) {} {} | {} License | {} */\n",
            meta.name, meta.version, year, meta.author, meta.license, meta.repository
        );
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Prepend the banner unless `contents` already starts with it.
    pub fn stamp(&self, contents: &str) -> String {
        if contents.starts_with(&self.text) {
            return contents.to_string();
        }
        let mut out = String::with_capacity(self.text.len() + contents.len());
        out.push_str(&self.text);
        out.push_str(contents);
        out
    }

    /// `contents` without a leading banner.
    pub fn strip<'c>(&self, contents: &'c str) -> &'c str {
        contents.strip_prefix(self.text.as_str()).unwrap_or(contents)
    }
}
