use image::{RgbaImage, imageops};

use crate::packing::Rect;
use crate::sprite::{PlacedSprite, fit_to_width};

/// A completed tile atlas
#[derive(Debug)]
pub struct Atlas {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Width in tiles
    pub columns: u32,
    /// Height in tiles
    pub rows: u32,
    /// Atlas width in pixels
    pub width: u32,
    /// Atlas height in pixels
    pub height: u32,
    /// Rendered atlas image
    pub image: RgbaImage,
    /// All sprites placed in this atlas, in placement order
    pub sprites: Vec<PlacedSprite>,
    /// Fraction of tiles in use
    pub occupancy: f64,
}

impl Atlas {
    pub fn new(tile_size: u32, columns: u32, rows: u32) -> Self {
        let width = tile_size * columns;
        let height = tile_size * rows;
        Self {
            tile_size,
            columns,
            rows,
            width,
            height,
            image: RgbaImage::new(width, height),
            sprites: Vec::new(),
            occupancy: 0.0,
        }
    }

    /// Composite a processed sprite at a tile position
    pub fn paste(&mut self, name: &str, rect: Rect, image: &RgbaImage) {
        let x = rect.x * self.tile_size;
        let y = rect.y * self.tile_size;
        imageops::overlay(&mut self.image, image, i64::from(x), i64::from(y));

        self.sprites.push(PlacedSprite {
            name: name.to_string(),
            tile_x: rect.x,
            tile_y: rect.y,
            tiles_wide: rect.width,
            tiles_high: rect.height,
            x,
            y,
            width: image.width(),
            height: image.height(),
        });
    }

    /// Copy of the atlas scaled down to at most `max_width` pixels wide
    pub fn preview(&self, max_width: u32) -> RgbaImage {
        fit_to_width(self.image.clone(), max_width)
    }
}
