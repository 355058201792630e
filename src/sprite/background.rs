use image::{RgbaImage, imageops};

use super::resize_exact;

/// Put a background behind a tile-normalized sprite.
///
/// Sprites taller than one tile get `tile` repeated per tile cell; one-row
/// sprites get `tile` stretched to their full size.
pub fn apply_background(img: &RgbaImage, tile: &RgbaImage, tile_size: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let cols = (w / tile_size).max(1);
    let rows = h / tile_size;

    let mut canvas = if rows > 1 {
        let mut tiled = RgbaImage::new(w, h);
        for ty in 0..rows {
            for tx in 0..cols {
                imageops::replace(
                    &mut tiled,
                    tile,
                    i64::from(tx * tile_size),
                    i64::from(ty * tile_size),
                );
            }
        }
        tiled
    } else {
        resize_exact(tile.clone(), w, h)
    };

    imageops::overlay(&mut canvas, img, 0, 0);
    canvas
}
