use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use log::debug;

use crate::cli::CompressionLevel;
use crate::error::TilesheetError;

/// Encode an image as PNG, optionally recompressing it with oxipng
pub fn encode_png(
    image: &RgbaImage,
    compress: Option<CompressionLevel>,
) -> Result<Vec<u8>, TilesheetError> {
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(TilesheetError::ImageEncode)?;
    let png_data = png_data.into_inner();

    let Some(level) = compress else {
        return Ok(png_data);
    };

    let opts = match level {
        CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
        CompressionLevel::Max => oxipng::Options::max_compression(),
    };
    let optimized = oxipng::optimize_from_memory(&png_data, &opts)
        .map_err(|e| TilesheetError::PngCompress(e.to_string()))?;
    debug!(
        "Compressed PNG from {} to {} bytes",
        png_data.len(),
        optimized.len()
    );
    Ok(optimized)
}

/// Encode and write an image to `path`
pub fn save_png(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<(), TilesheetError> {
    let data = encode_png(image, compress)?;
    fs::write(path, data).map_err(|e| TilesheetError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
