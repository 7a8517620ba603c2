// src/convert/css.rs

//! CSS post-processing on lightningcss: vendor prefixing for the supported
//! browsers and minification.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::convert::pipeline::{Minify, Prefix};

/// Encode a browser version the way lightningcss expects it.
const fn version(major: u32) -> Option<u32> {
    Some(major << 16)
}

/// Oldest browsers the generated stylesheets still support.
pub fn supported_browsers() -> Browsers {
    Browsers {
        chrome: version(80),
        edge: version(80),
        firefox: version(78),
        safari: version(13),
        ios_saf: version(13),
        samsung: version(12),
        ..Browsers::default()
    }
}

/// Prefixes and minifies stylesheets for a fixed browser target set.
#[derive(Debug, Clone, Copy)]
pub struct CssProcessor {
    targets: Targets,
}

impl CssProcessor {
    pub fn new(browsers: Browsers) -> Self {
        Self {
            targets: Targets::from(browsers),
        }
    }

    fn process(&self, source: &str, minify: bool) -> Result<String> {
        let mut sheet = StyleSheet::parse(source, ParserOptions::default())
            .map_err(|e| anyhow!("parsing css: {e}"))?;
        sheet
            .minify(MinifyOptions {
                targets: self.targets,
                ..MinifyOptions::default()
            })
            .map_err(|e| anyhow!("transforming css: {e}"))?;
        let out = sheet
            .to_css(PrinterOptions {
                minify,
                targets: self.targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| anyhow!("printing css: {e}"))?;
        Ok(out.code)
    }
}

impl Default for CssProcessor {
    fn default() -> Self {
        Self::new(supported_browsers())
    }
}

impl Prefix for CssProcessor {
    fn prefix(&self, source: &str) -> Result<String> {
        self.process(source, false)
    }
}

impl Minify for CssProcessor {
    fn minify(&self, source: &str) -> Result<String> {
        self.process(source, true)
    }
}
