// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::dag::composites;
use crate::types::Feature;

/// Command-line arguments for `assetdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetdag",
    version,
    about = "Build front-end assets from feature-toggled task composites.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Assetdag.toml` in the current working directory. A missing
    /// default file means stock settings.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSETDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Load + validate, print the resolved settings and task stages, but
    /// don't run anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Switch a feature off for this invocation, on top of `[settings]`.
    /// May be repeated.
    #[arg(long = "disable", value_name = "FEATURE", global = true)]
    pub disable: Vec<Feature>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Clean, then build every enabled asset class (the default).
    #[default]
    Build,
    /// Build, start live reload, then rebuild on every change until Ctrl-C.
    Watch,
    /// Build and lint scripts only.
    Scripts,
    /// Compile stylesheets only.
    Styles,
    /// Optimize SVGs and images and build the sprite.
    Assets,
    /// Copy static files.
    Copy,
    /// Copy vendored script libraries.
    CopyLibs,
    /// Run a single primitive task, e.g. `styles:build`.
    Task {
        /// Primitive task name.
        name: String,
    },
}

impl Command {
    /// Composite this command runs; `None` for a single primitive.
    pub fn composite(&self) -> Option<&'static str> {
        let name = match self {
            Command::Build => composites::DEFAULT,
            Command::Watch => composites::WATCH,
            Command::Scripts => composites::SCRIPTS,
            Command::Styles => composites::STYLES,
            Command::Assets => composites::ASSETS,
            Command::Copy => composites::COPY,
            Command::CopyLibs => composites::COPY_LIBS,
            Command::Task { .. } => return None,
        };
        Some(name)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_build() {
        let args = CliArgs::parse_from(["assetdag"]);
        assert_eq!(args.command.unwrap_or_default(), Command::Build);
        assert!(args.config.is_none());
    }

    #[test]
    fn kebab_case_subcommand_and_global_flags() {
        let args = CliArgs::parse_from(["assetdag", "copy-libs", "--dry-run", "--config", "a.toml"]);
        assert_eq!(args.command, Some(Command::CopyLibs));
        assert_eq!(args.command.as_ref().and_then(Command::composite), Some("copy-libs"));
        assert!(args.dry_run);
        assert_eq!(args.config.as_deref(), Some(std::path::Path::new("a.toml")));
    }

    #[test]
    fn task_subcommand_names_a_primitive() {
        let args = CliArgs::parse_from(["assetdag", "task", "styles:build"]);
        let command = args.command.unwrap();
        assert_eq!(
            command,
            Command::Task {
                name: "styles:build".to_string()
            }
        );
        assert_eq!(command.composite(), None);
    }

    #[test]
    fn disable_flag_repeats_and_parses_feature_names() {
        let args = CliArgs::parse_from([
            "assetdag",
            "--disable",
            "images",
            "--disable",
            "Reload",
            "watch",
        ]);
        assert_eq!(args.command, Some(Command::Watch));
        assert_eq!(args.disable, vec![Feature::Images, Feature::Reload]);
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let err = CliArgs::try_parse_from(["assetdag", "--disable", "minify"]).unwrap_err();
        assert!(err.to_string().contains("unknown feature"), "{err}");
    }
}
