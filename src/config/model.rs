// src/config/model.rs

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::banner::Banner;
use crate::config::project::ProjectMeta;
use crate::types::Feature;

/// Top-level configuration as read from `Assetdag.toml`.
///
/// ```toml
/// [settings]
/// polyfills = false
/// reload = false
///
/// [paths]
/// output = "public/"
///
/// [paths.styles]
/// input = "assets/scss/**/*.scss"
/// output = "public/css/"
///
/// [project]
/// name = "my-site"
/// version = "1.2.0"
/// author = "Jane Doe"
/// license = "MIT"
/// repository = "https://example.com/my-site"
/// ```
///
/// Every section is optional. An empty file yields the stock `src/` → `dist/`
/// layout with every feature switched on, but project metadata must then be
/// found in `package.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Feature toggles from `[settings]`.
    #[serde(default)]
    pub settings: Settings,

    /// Input globs and output directories from `[paths]`.
    #[serde(default)]
    pub paths: PathsSection,

    /// Banner metadata from `[project]`.
    #[serde(default)]
    pub project: Option<ProjectMeta>,

    /// Live-reload server from `[server]`.
    #[serde(default)]
    pub server: ServerSection,
}

/// `[settings]` section: one switch per build capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub clean: bool,
    pub scripts: bool,
    pub libs: bool,
    pub polyfills: bool,
    pub styles: bool,
    pub svgs: bool,
    pub sprite: bool,
    pub images: bool,
    pub copy: bool,
    pub reload: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clean: true,
            scripts: true,
            libs: true,
            polyfills: true,
            styles: true,
            svgs: true,
            sprite: true,
            images: true,
            copy: true,
            reload: true,
        }
    }
}

impl Settings {
    /// Every feature switched off.
    pub fn all_disabled() -> Self {
        Feature::ALL
            .into_iter()
            .fold(Self::default(), |s, f| s.with(f, false))
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Clean => self.clean,
            Feature::Scripts => self.scripts,
            Feature::Libs => self.libs,
            Feature::Polyfills => self.polyfills,
            Feature::Styles => self.styles,
            Feature::Svgs => self.svgs,
            Feature::Sprite => self.sprite,
            Feature::Images => self.images,
            Feature::Copy => self.copy,
            Feature::Reload => self.reload,
        }
    }

    /// Return a copy with `feature` set to `enabled`.
    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        let slot = match feature {
            Feature::Clean => &mut self.clean,
            Feature::Scripts => &mut self.scripts,
            Feature::Libs => &mut self.libs,
            Feature::Polyfills => &mut self.polyfills,
            Feature::Styles => &mut self.styles,
            Feature::Svgs => &mut self.svgs,
            Feature::Sprite => &mut self.sprite,
            Feature::Images => &mut self.images,
            Feature::Copy => &mut self.copy,
            Feature::Reload => &mut self.reload,
        };
        *slot = enabled;
        self
    }
}

/// `[paths]` section.
///
/// All values are relative to the project root. A per-class table that is
/// present must spell out all of its keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub input: String,
    pub output: String,
    /// Directory served by the live-reload server.
    pub reload: String,
    pub scripts: ScriptPaths,
    pub libs: AssetPaths,
    pub styles: AssetPaths,
    pub images: AssetPaths,
    pub svgs: AssetPaths,
    pub copy: AssetPaths,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            input: "src/".to_string(),
            output: "dist/".to_string(),
            reload: "dist/".to_string(),
            scripts: ScriptPaths::default(),
            libs: AssetPaths::new("src/libs/*", "dist/js/"),
            styles: AssetPaths::new("src/sass/**/*.{scss,sass}", "dist/css/"),
            images: AssetPaths::new("src/img/**/*.{jpg,jpeg,gif,png}", "dist/img/"),
            svgs: AssetPaths::new("src/svg/*.svg", "dist/img/"),
            copy: AssetPaths::new("src/copy/**/*", "dist/"),
        }
    }
}

impl PathsSection {
    /// Output directory of every asset class, keyed by the class name.
    pub fn asset_outputs(&self) -> [(&'static str, &str); 6] {
        [
            ("scripts", self.scripts.output.as_str()),
            ("libs", self.libs.output.as_str()),
            ("styles", self.styles.output.as_str()),
            ("images", self.images.output.as_str()),
            ("svgs", self.svgs.output.as_str()),
            ("copy", self.copy.output.as_str()),
        ]
    }

    /// Every glob in the section, with a label for error messages.
    pub fn globs(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("paths.scripts.input", self.scripts.input.as_str()),
            ("paths.scripts.watch", self.scripts.watch.as_str()),
            ("paths.libs.input", self.libs.input.as_str()),
            ("paths.styles.input", self.styles.input.as_str()),
            ("paths.images.input", self.images.input.as_str()),
            ("paths.svgs.input", self.svgs.input.as_str()),
            ("paths.copy.input", self.copy.input.as_str()),
        ]
    }
}

/// `[paths.scripts]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptPaths {
    /// Top-level entries: files are processed alone, directories are bundled.
    pub input: String,
    /// Glob watched in `watch` mode (deeper than `input`).
    pub watch: String,
    /// File-name suffix that marks a polyfill inside a bundle directory.
    pub polyfills: String,
    pub output: String,
}

impl Default for ScriptPaths {
    fn default() -> Self {
        Self {
            input: "src/js/*".to_string(),
            watch: "src/js/**/*.js".to_string(),
            polyfills: ".polyfill.js".to_string(),
            output: "dist/js/".to_string(),
        }
    }
}

/// Input glob + output directory for a simple asset class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetPaths {
    pub input: String,
    pub output: String,
}

impl AssetPaths {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// `[server]` section for the live-reload server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Validated, immutable build configuration.
///
/// Constructed once at startup (see [`crate::config::load_and_validate`]) and
/// shared by `Arc` with every task factory.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    root: PathBuf,
    settings: Settings,
    paths: PathsSection,
    project: ProjectMeta,
    banner: Banner,
    server: ServerSection,
}

impl BuildConfig {
    /// Assemble a config without running validation. Prefer
    /// [`BuildConfig::validate`].
    pub(crate) fn new_unchecked(
        root: PathBuf,
        settings: Settings,
        paths: PathsSection,
        project: ProjectMeta,
        banner: Banner,
        server: ServerSection,
    ) -> Self {
        Self {
            root,
            settings,
            paths,
            project,
            banner,
            server,
        }
    }

    /// Project root; every configured path is relative to it.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switch `features` off on top of the configured settings.
    pub fn with_disabled(mut self, features: &[Feature]) -> Self {
        for &feature in features {
            self.settings = self.settings.with(feature, false);
        }
        self
    }

    pub fn paths(&self) -> &PathsSection {
        &self.paths
    }

    pub fn project(&self) -> &ProjectMeta {
        &self.project
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn server(&self) -> &ServerSection {
        &self.server
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output)
    }

    pub fn reload_dir(&self) -> PathBuf {
        self.resolve(&self.paths.reload)
    }
}

/// Lexically normalise a relative path: drop `.` components and trailing
/// separators so `./dist/` and `dist` compare equal.
pub fn normalize_rel(path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
