//! Deterministic PNG writer.
//!
//! Fixed compression and filter settings keep the output byte-identical for
//! identical canvases, so unchanged renders compare equal without decoding.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::canvas::Canvas;
use crate::ImageFormat;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write a canvas to a PNG file in the requested pixel layout.
pub fn write_canvas(
    canvas: &Canvas,
    format: ImageFormat,
    path: &Path,
    config: &PngConfig,
) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_canvas_to_writer(canvas, format, writer, config)
}

/// Write a canvas to any writer.
pub fn write_canvas_to_writer<W: Write>(
    canvas: &Canvas,
    format: ImageFormat,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(PngError::InvalidDimensions(format!(
            "{}x{} canvas",
            canvas.width, canvas.height
        )));
    }

    let (color_type, data) = match format {
        ImageFormat::Rgba => (ColorType::Rgba, canvas.to_rgba8()),
        ImageFormat::Rgb => (ColorType::Rgb, canvas.to_rgb8()),
    };

    let mut encoder = Encoder::new(writer, canvas.width, canvas.height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&data)?;

    Ok(())
}
