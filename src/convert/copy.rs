// src/convert/copy.rs

use std::path::PathBuf;

use anyhow::Result;

use crate::convert::{ConvertRequest, Converter};
use crate::fs::copy_output;

/// Copies matched files verbatim, preserving their layout below the glob
/// base. Used for both static files and vendored script libraries.
#[derive(Debug, Clone, Copy)]
pub struct CopyConverter {
    label: &'static str,
}

impl CopyConverter {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl Converter for CopyConverter {
    fn name(&self) -> &'static str {
        self.label
    }

    fn convert(&self, request: &ConvertRequest) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for entry in request.files()? {
            let out = request.output.join(&entry.rel);
            copy_output(&entry.path, &out)?;
            written.push(out);
        }
        Ok(written)
    }
}
