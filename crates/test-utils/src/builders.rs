#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use assetdag::config::{BuildConfig, load_and_validate};
use assetdag::types::Feature;
use tempfile::TempDir;

pub const CONFIG_FILE: &str = "Assetdag.toml";

const PROJECT_TOML: &str = r#"[project]
name = "demo-site"
version = "2.1.0"
author = "Demo Author"
license = "MIT"
repository = "https://example.com/demo-site"
"#;

/// Builder for an on-disk project in a temporary directory.
pub struct ProjectBuilder {
    files: Vec<(PathBuf, Vec<u8>)>,
    disabled: Vec<Feature>,
    extra_toml: String,
    with_project: bool,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            disabled: Vec::new(),
            extra_toml: String::new(),
            with_project: true,
        }
    }

    /// A representative source tree covering every asset class except
    /// images (see [`ProjectBuilder::with_png`]).
    pub fn stock_sources(self) -> Self {
        self.file("src/js/app.js", "function greet(name) {\n  return 'hi ' + name;\n}\n")
            .file("src/js/vendor/a.js", "var a = 1;\n")
            .file("src/js/vendor/b.polyfill.js", "if (!window.fetch) { window.fetch = 1; }\n")
            .file("src/libs/jquery.js", "/* vendored */\nvar $ = {};\n")
            .file("src/sass/_vars.scss", "$brand: #336699;\n")
            .file(
                "src/sass/main.scss",
                "@import 'vars';\nbody {\n  color: $brand;\n  .title { margin: 0; }\n}\n",
            )
            .file(
                "src/svg/close.svg",
                "<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 8 8\">\n  <path d=\"M0 0L8 8\"/>\n</svg>\n",
            )
            .file("src/copy/robots.txt", "User-agent: *\n")
            .file("src/copy/index.html", "<html><body>hello</body></html>\n")
    }

    pub fn file(mut self, rel: &str, contents: impl AsRef<[u8]>) -> Self {
        self.files
            .push((PathBuf::from(rel), contents.as_ref().to_vec()));
        self
    }

    /// Add a solid-colour PNG of the given size.
    pub fn with_png(self, rel: &str, width: u32, height: u32) -> Self {
        let bytes = png_bytes(width, height);
        self.file(rel, bytes)
    }

    pub fn disable(mut self, feature: Feature) -> Self {
        self.disabled.push(feature);
        self
    }

    pub fn disable_all(mut self) -> Self {
        self.disabled = Feature::ALL.to_vec();
        self
    }

    /// Extra TOML appended to the generated config file.
    pub fn toml(mut self, extra: &str) -> Self {
        self.extra_toml.push_str(extra);
        self.extra_toml.push('\n');
        self
    }

    /// Leave out the `[project]` section.
    pub fn without_project(mut self) -> Self {
        self.with_project = false;
        self
    }

    pub fn build(self) -> Project {
        let dir = tempfile::tempdir().expect("create temp project dir");

        for (rel, contents) in &self.files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create fixture dir");
            }
            fs::write(&path, contents).expect("write fixture file");
        }

        let mut toml = String::new();
        if !self.disabled.is_empty() {
            toml.push_str("[settings]\n");
            for feature in &self.disabled {
                toml.push_str(&format!("{} = false\n", feature.as_str()));
            }
            toml.push('\n');
        }
        if self.with_project {
            toml.push_str(PROJECT_TOML);
            toml.push('\n');
        }
        toml.push_str(&self.extra_toml);

        let config_path = dir.path().join(CONFIG_FILE);
        fs::write(&config_path, toml).expect("write config file");

        Project { dir, config_path }
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A project materialised on disk. Removed when dropped.
pub struct Project {
    dir: TempDir,
    config_path: PathBuf,
}

impl Project {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap_or_else(|e| panic!("reading {rel}: {e}"))
    }

    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dir");
        }
        fs::write(path, contents).expect("write file");
    }

    /// Load and validate the project's config file.
    pub fn config(&self) -> BuildConfig {
        load_and_validate(&self.config_path).expect("valid fixture config")
    }

    /// Every file under the project with its contents, keyed by relative
    /// path. Used to assert that nothing changed on disk.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut out = BTreeMap::new();
        let mut stack = vec![self.root().to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).expect("read dir") {
                let path = entry.expect("dir entry").path();
                if path.is_dir() {
                    out.insert(rel_to(self.root(), &path), Vec::new());
                    stack.push(path);
                } else {
                    let contents = fs::read(&path).expect("read file");
                    out.insert(rel_to(self.root(), &path), contents);
                }
            }
        }
        out
    }
}

fn rel_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Encode a solid-colour RGB PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png fixture");
    out.into_inner()
}
