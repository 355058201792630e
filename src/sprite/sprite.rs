use image::RgbaImage;
use serde::Serialize;

/// A sprite or shadow file as submitted to a build
#[derive(Debug, Clone)]
pub struct SpriteInput {
    /// File name, extension included. Shadow matching works on this.
    pub name: String,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

impl SpriteInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Decode to an RGBA8 buffer
    pub fn decode(&self) -> image::ImageResult<RgbaImage> {
        decode_image(&self.bytes)
    }
}

/// Decode encoded image bytes to RGBA8
pub fn decode_image(bytes: &[u8]) -> image::ImageResult<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.into_rgba8())
}

/// True if both images have the same dimensions and identical pixels
pub fn pixels_equal(a: &RgbaImage, b: &RgbaImage) -> bool {
    a.dimensions() == b.dimensions() && a.as_raw() == b.as_raw()
}

/// A processed sprite's location in the atlas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedSprite {
    /// Source file name
    pub name: String,
    /// Column of the top-left tile
    pub tile_x: u32,
    /// Row of the top-left tile
    pub tile_y: u32,
    /// Footprint width in tiles
    pub tiles_wide: u32,
    /// Footprint height in tiles
    pub tiles_high: u32,
    /// Pixel position in the atlas (x coordinate)
    pub x: u32,
    /// Pixel position in the atlas (y coordinate)
    pub y: u32,
    /// Width in atlas pixels
    pub width: u32,
    /// Height in atlas pixels
    pub height: u32,
}
