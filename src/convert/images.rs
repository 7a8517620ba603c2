// src/convert/images.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use tracing::debug;

use crate::convert::{ConvertRequest, Converter};
use crate::fs::write_output;

pub const JPEG_QUALITY: u8 = 70;

/// Recompresses JPEG and PNG images; everything else (GIFs included) is
/// copied through. A re-encode that comes out larger than its source is
/// discarded in favour of the original bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagesConverter;

impl Converter for ImagesConverter {
    fn name(&self) -> &'static str {
        "images"
    }

    fn convert(&self, request: &ConvertRequest) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for entry in request.files()? {
            let source =
                fs::read(&entry.path).with_context(|| format!("reading {}", entry.path.display()))?;
            let optimized = recompress(&entry.path, &source)
                .with_context(|| format!("optimizing {}", entry.path.display()))?;

            let bytes = match optimized {
                Some(smaller) if smaller.len() < source.len() => smaller,
                _ => {
                    debug!(file = %entry.path.display(), "keeping original image bytes");
                    source
                }
            };

            let out = request.output.join(&entry.rel);
            write_output(&out, bytes)?;
            written.push(out);
        }

        Ok(written)
    }
}

fn recompress(path: &Path, source: &[u8]) -> Result<Option<Vec<u8>>> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => encode_jpeg(source).map(Some),
        "png" => encode_png(source).map(Some),
        _ => Ok(None),
    }
}

fn encode_jpeg(source: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(source)?;
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))?;
    Ok(out)
}

fn encode_png(source: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(source)?;
    let mut out = Vec::new();
    img.write_with_encoder(PngEncoder::new_with_quality(
        &mut out,
        CompressionType::Best,
        FilterType::Adaptive,
    ))?;
    Ok(out)
}
