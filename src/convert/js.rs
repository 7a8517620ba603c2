// src/convert/js.rs

//! JavaScript parsing and minification on the oxc toolchain.
//!
//! Sources are classic browser scripts, so they are parsed as scripts
//! rather than modules. Panics inside the parser or minifier are caught
//! and surfaced as errors.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use anyhow::{Result, anyhow};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::convert::pipeline::Minify;

/// Syntax errors in `source`, rendered as text. Empty when it parses.
///
/// Fails only when the parser itself panics.
pub fn syntax_errors(source: &str) -> Result<Vec<String>> {
    guarded(|| {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
        ret.errors.iter().map(|e| e.to_string()).collect()
    })
}

/// JavaScript minifier: compresses and prints without whitespace.
///
/// Identifiers keep their names and `function` expressions stay functions,
/// so hoisting and `this` binding are preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsMinifier;

impl Minify for JsMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        guarded(|| {
            let allocator = Allocator::default();
            let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
            if let Some(err) = ret.errors.first() {
                return Err(anyhow!("syntax error: {err}"));
            }
            let mut program = ret.program;
            let options = MinifierOptions {
                mangle: None,
                ..MinifierOptions::default()
            };
            Minifier::new(options).build(&allocator, &mut program);
            let code = Codegen::new()
                .with_options(CodegenOptions {
                    minify: true,
                    ..CodegenOptions::default()
                })
                .build(&program)
                .code;
            Ok(code)
        })?
    }
}

fn guarded<T>(f: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| anyhow!("javascript toolchain panicked: {}", panic_message(&payload)))
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
