// src/task/registry.rs

//! Factory for the primitive tasks of a build.
//!
//! Every primitive is bound to the shared [`BuildConfig`] and, for the two
//! reload tasks, to the process-wide [`ReloadSession`]. Converters are
//! blocking, so they run on Tokio's blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use crate::config::BuildConfig;
use crate::convert::{
    ConvertRequest, Converter, CopyConverter, ImagesConverter, ScriptLinter, ScriptsConverter,
    SpriteConverter, StylesConverter, SvgConverter,
};
use crate::fs::clean_dir;
use crate::reload::ReloadSession;
use crate::task::Task;
use crate::types::Feature;

pub const CLEAN: &str = "clean";
pub const SCRIPTS_BUILD: &str = "scripts:build";
pub const SCRIPTS_LINT: &str = "scripts:lint";
pub const STYLES_BUILD: &str = "styles:build";
pub const SVGS_OPTIMIZE: &str = "svgs:optimize";
pub const SVGS_SPRITE: &str = "svgs:sprite";
pub const IMAGES_OPTIMIZE: &str = "images:optimize";
pub const COPY_FILES: &str = "copy:files";
pub const COPY_LIBS: &str = "copy:libs";
pub const RELOAD_START: &str = "reload:start";
pub const RELOAD_NOTIFY: &str = "reload:notify";

/// Names of every primitive, in declaration order.
pub const PRIMITIVES: [&str; 11] = [
    CLEAN,
    SCRIPTS_BUILD,
    SCRIPTS_LINT,
    STYLES_BUILD,
    SVGS_OPTIMIZE,
    SVGS_SPRITE,
    IMAGES_OPTIMIZE,
    COPY_FILES,
    COPY_LIBS,
    RELOAD_START,
    RELOAD_NOTIFY,
];

#[derive(Debug, Clone)]
pub struct TaskRegistry {
    config: Arc<BuildConfig>,
    session: Arc<ReloadSession>,
}

impl TaskRegistry {
    pub fn new(config: Arc<BuildConfig>, session: Arc<ReloadSession>) -> Self {
        Self { config, session }
    }

    /// Build the primitive with the given name.
    pub fn task(&self, name: &str) -> Option<Arc<Task>> {
        let task = match name {
            CLEAN => self.clean(),
            SCRIPTS_BUILD => self.scripts_build(),
            SCRIPTS_LINT => self.scripts_lint(),
            STYLES_BUILD => self.styles_build(),
            SVGS_OPTIMIZE => self.svgs_optimize(),
            SVGS_SPRITE => self.svgs_sprite(),
            IMAGES_OPTIMIZE => self.images_optimize(),
            COPY_FILES => self.copy_files(),
            COPY_LIBS => self.copy_libs(),
            RELOAD_START => self.reload_start(),
            RELOAD_NOTIFY => self.reload_notify(),
            _ => return None,
        };
        Some(Arc::new(task))
    }

    /// Remove and recreate the output directory.
    pub fn clean(&self) -> Task {
        let output = self.config.output_dir();
        Task::new(CLEAN, Feature::Clean, *self.config.settings(), move || {
            let output = output.clone();
            async move {
                tokio::task::spawn_blocking(move || clean_dir(&output))
                    .await
                    .context("clean worker panicked")?
            }
        })
    }

    pub fn scripts_build(&self) -> Task {
        let paths = &self.config.paths().scripts;
        let converter = ScriptsConverter::new(
            self.config.banner().clone(),
            self.config.settings().polyfills,
            paths.polyfills.clone(),
        );
        self.converter_task(SCRIPTS_BUILD, Feature::Scripts, converter, &paths.input, &paths.output)
    }

    pub fn scripts_lint(&self) -> Task {
        let paths = &self.config.paths().scripts;
        self.converter_task(SCRIPTS_LINT, Feature::Scripts, ScriptLinter, &paths.input, &paths.output)
    }

    pub fn styles_build(&self) -> Task {
        let paths = &self.config.paths().styles;
        let converter = StylesConverter::new(self.config.banner().clone());
        self.converter_task(STYLES_BUILD, Feature::Styles, converter, &paths.input, &paths.output)
    }

    pub fn svgs_optimize(&self) -> Task {
        let paths = &self.config.paths().svgs;
        self.converter_task(SVGS_OPTIMIZE, Feature::Svgs, SvgConverter, &paths.input, &paths.output)
    }

    pub fn svgs_sprite(&self) -> Task {
        let paths = &self.config.paths().svgs;
        self.converter_task(SVGS_SPRITE, Feature::Sprite, SpriteConverter, &paths.input, &paths.output)
    }

    pub fn images_optimize(&self) -> Task {
        let paths = &self.config.paths().images;
        self.converter_task(
            IMAGES_OPTIMIZE,
            Feature::Images,
            ImagesConverter,
            &paths.input,
            &paths.output,
        )
    }

    pub fn copy_files(&self) -> Task {
        let paths = &self.config.paths().copy;
        self.converter_task(
            COPY_FILES,
            Feature::Copy,
            CopyConverter::new("copy"),
            &paths.input,
            &paths.output,
        )
    }

    pub fn copy_libs(&self) -> Task {
        let paths = &self.config.paths().libs;
        self.converter_task(
            COPY_LIBS,
            Feature::Libs,
            CopyConverter::new("libs"),
            &paths.input,
            &paths.output,
        )
    }

    /// Start the live-reload session on the reload root.
    pub fn reload_start(&self) -> Task {
        let session = Arc::clone(&self.session);
        let root = self.config.reload_dir();
        Task::new(RELOAD_START, Feature::Reload, *self.config.settings(), move || {
            let session = Arc::clone(&session);
            let root = root.clone();
            async move { session.start(&root) }
        })
    }

    /// Ask connected browsers to reload. Harmless before `reload:start`.
    pub fn reload_notify(&self) -> Task {
        let session = Arc::clone(&self.session);
        Task::new(RELOAD_NOTIFY, Feature::Reload, *self.config.settings(), move || {
            let session = Arc::clone(&session);
            async move {
                session.notify();
                Ok::<(), anyhow::Error>(())
            }
        })
    }

    fn converter_task(
        &self,
        name: &'static str,
        feature: Feature,
        converter: impl Converter + 'static,
        input: &str,
        output: &str,
    ) -> Task {
        let converter: Arc<dyn Converter> = Arc::new(converter);
        let request = Arc::new(ConvertRequest::new(
            self.config.root(),
            vec![input.to_string()],
            self.config.resolve(output),
        ));

        Task::new(name, feature, *self.config.settings(), move || {
            let converter = Arc::clone(&converter);
            let request = Arc::clone(&request);
            async move {
                let label = converter.name();
                let written: Vec<PathBuf> =
                    tokio::task::spawn_blocking(move || converter.convert(&request))
                        .await
                        .with_context(|| format!("{label} converter panicked"))??;
                debug!(task = name, converter = label, files = written.len(), "converter wrote outputs");
                Ok::<(), anyhow::Error>(())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::{ProjectMeta, RawConfigFile};
    use crate::reload::ReloadTransport;

    #[derive(Debug)]
    struct NullTransport;

    impl ReloadTransport for NullTransport {
        fn start(&self, _root: &Path) -> anyhow::Result<()> {
            Ok(())
        }
        fn notify(&self) {}
    }

    fn registry(raw: RawConfigFile) -> TaskRegistry {
        let meta = ProjectMeta {
            name: "site".into(),
            version: "1.0.0".into(),
            author: "Jo".into(),
            license: "MIT".into(),
            repository: "https://example.com/site".into(),
        };
        let cfg = BuildConfig::validate(raw, "/project".into(), Some(meta)).unwrap();
        let session = Arc::new(ReloadSession::new(Arc::new(NullTransport)));
        TaskRegistry::new(Arc::new(cfg), session)
    }

    #[test]
    fn every_primitive_is_available_by_name() {
        let registry = registry(RawConfigFile::default());
        for name in PRIMITIVES {
            assert_eq!(registry.task(name).unwrap().name(), name);
        }
        assert!(registry.task("deploy").is_none());
    }

    #[test]
    fn primitives_follow_their_toggles() {
        let mut raw = RawConfigFile::default();
        raw.settings = raw.settings.with(Feature::Sprite, false);
        let registry = registry(raw);

        assert!(!registry.svgs_sprite().is_enabled());
        assert!(registry.svgs_optimize().is_enabled());
        assert_eq!(registry.copy_libs().feature(), Feature::Libs);
        assert_eq!(registry.scripts_lint().feature(), Feature::Scripts);
    }

    #[test]
    fn all_disabled_turns_off_every_primitive() {
        let raw = RawConfigFile {
            settings: crate::config::Settings::all_disabled(),
            ..RawConfigFile::default()
        };
        let registry = registry(raw);
        for name in PRIMITIVES {
            assert!(!registry.task(name).unwrap().is_enabled(), "{name}");
        }
    }
}
