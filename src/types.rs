// src/types.rs

use std::fmt;
use std::str::FromStr;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Name of a watch binding (one per logical asset group).
pub type BindingName = String;

/// Build capabilities that can be switched on and off in `[settings]`.
///
/// Every primitive task is gated by exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Clean,
    Scripts,
    Libs,
    Polyfills,
    Styles,
    Svgs,
    Sprite,
    Images,
    Copy,
    Reload,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Feature::Clean,
        Feature::Scripts,
        Feature::Libs,
        Feature::Polyfills,
        Feature::Styles,
        Feature::Svgs,
        Feature::Sprite,
        Feature::Images,
        Feature::Copy,
        Feature::Reload,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Clean => "clean",
            Feature::Scripts => "scripts",
            Feature::Libs => "libs",
            Feature::Polyfills => "polyfills",
            Feature::Styles => "styles",
            Feature::Svgs => "svgs",
            Feature::Sprite => "sprite",
            Feature::Images => "images",
            Feature::Copy => "copy",
            Feature::Reload => "reload",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| format!("unknown feature: {wanted}"))
    }
}

/// Result of a single primitive task invocation.
///
/// `Skipped` is a successful completion: the feature was disabled and the
/// task did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Skipped,
    Failed(String),
}

impl TaskOutcome {
    /// Whether this outcome lets a composite make forward progress.
    pub fn is_done(&self) -> bool {
        !matches!(self, TaskOutcome::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_parses_case_insensitively() {
        assert_eq!("Sprite".parse::<Feature>(), Ok(Feature::Sprite));
        assert_eq!(" reload ".parse::<Feature>(), Ok(Feature::Reload));
        assert!("minify".parse::<Feature>().is_err());
    }

    #[test]
    fn skipped_counts_as_done() {
        assert!(TaskOutcome::Skipped.is_done());
        assert!(TaskOutcome::Success.is_done());
        assert!(!TaskOutcome::Failed("boom".into()).is_done());
    }
}
