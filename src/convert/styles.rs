// src/convert/styles.rs

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use grass::{Options, OutputStyle};
use tracing::debug;

use crate::banner::Banner;
use crate::convert::css::CssProcessor;
use crate::convert::pipeline::{Artifact, Pipeline};
use crate::convert::{ConvertRequest, Converter};

/// Compiles Sass entry points into `<stem>.css` and `<stem>.min.css`.
///
/// The expanded Sass output is vendor-prefixed before it is written; the
/// `.min` twin is minified from the prefixed text. Partials (file names
/// starting with `_`) are only reachable through imports and are never
/// compiled on their own.
#[derive(Debug, Clone)]
pub struct StylesConverter {
    banner: Banner,
    css: CssProcessor,
}

impl StylesConverter {
    pub fn new(banner: Banner) -> Self {
        Self {
            banner,
            css: CssProcessor::default(),
        }
    }
}

impl Converter for StylesConverter {
    fn name(&self) -> &'static str {
        "styles"
    }

    fn convert(&self, request: &ConvertRequest) -> Result<Vec<PathBuf>> {
        let options = Options::default().style(OutputStyle::Expanded);
        let pipeline = Pipeline::style(&self.banner, &request.output, &self.css);
        let mut written = Vec::new();

        for entry in request.files()? {
            if is_partial(&entry.rel) {
                debug!(file = %entry.path.display(), "skipping sass partial");
                continue;
            }

            let css = grass::from_path(&entry.path, &options)
                .map_err(|e| anyhow!("compiling {}: {e}", entry.path.display()))?;
            written.extend(pipeline.run(Artifact::new(entry.rel.with_extension("css"), css))?);
        }

        Ok(written)
    }
}

fn is_partial(rel: &std::path::Path) -> bool {
    rel.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectMeta;

    fn banner() -> Banner {
        Banner::new(
            &ProjectMeta {
                name: "site".into(),
                version: "1.0.0".into(),
                author: "Jane".into(),
                license: "MIT".into(),
                repository: "https://example.com".into(),
            },
            2026,
        )
    }

    #[test]
    fn compiles_prefixes_and_minifies_each_entry() {
        let dir = tempfile::tempdir().unwrap();
        let sass = dir.path().join("src/sass");
        std::fs::create_dir_all(&sass).unwrap();
        std::fs::write(sass.join("_vars.scss"), "$brand: #336699;\n").unwrap();
        std::fs::write(
            sass.join("main.scss"),
            "@import 'vars';\n.nav {\n  color: $brand;\n  a { user-select: none; }\n}\n",
        )
        .unwrap();
        let request = ConvertRequest::new(
            dir.path(),
            vec!["src/sass/**/*.scss".to_string()],
            dir.path().join("dist/css"),
        );
        let banner = banner();

        let written = StylesConverter::new(banner.clone()).convert(&request).unwrap();

        let out = dir.path().join("dist/css");
        assert_eq!(written, vec![out.join("main.css"), out.join("main.min.css")]);
        let css = std::fs::read_to_string(out.join("main.css")).unwrap();
        let min = std::fs::read_to_string(out.join("main.min.css")).unwrap();
        assert!(css.starts_with(banner.text()));
        assert!(css.contains("-webkit-user-select: none"), "{css}");
        assert!(css.contains(".nav a"), "{css}");
        assert!(min.starts_with(banner.text()));
        assert!(min.contains("-webkit-user-select:none"), "{min}");
        assert!(min.len() < css.len());
        assert!(!out.join("_vars.css").exists());
    }
}
