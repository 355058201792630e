use image::{RgbaImage, imageops::FilterType};

/// Round to the nearest integer, halves away from zero
pub fn round_half_up(n: f64) -> i64 {
    if n >= 0.0 {
        (n + 0.5).floor() as i64
    } else {
        (n - 0.5).ceil() as i64
    }
}

/// Whole number of tile rows a sprite of this size should occupy.
///
/// Zero for sprites more than twice as wide as they are tall.
pub fn aspect_multiplier(width: u32, height: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    let rows = round_half_up(f64::from(height) / f64::from(width));
    u32::try_from(rows).unwrap_or(0)
}

/// Resize a sprite to one tile wide and a whole number of tiles tall.
///
/// Returns `None` when the aspect ratio rounds to zero rows.
pub fn normalize_to_tile(img: RgbaImage, tile_size: u32) -> Option<RgbaImage> {
    let (w, h) = img.dimensions();
    let rows = aspect_multiplier(w, h);
    if rows == 0 {
        return None;
    }
    Some(resize_exact(img, tile_size, tile_size * rows))
}

/// Resize to exact dimensions with Lanczos3; a no-op if already that size
pub fn resize_exact(img: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img;
    }
    image::imageops::resize(&img, width, height, FilterType::Lanczos3)
}

/// Resize an image to a target width, preserving aspect ratio
pub fn resize_to_width(img: &RgbaImage, target_width: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let scale = f64::from(target_width) / f64::from(w);
    let new_height = (f64::from(h) * scale).floor() as u32;
    image::imageops::resize(img, target_width, new_height.max(1), FilterType::Lanczos3)
}

/// Downscale an image so it is at most `max_width` wide
pub fn fit_to_width(img: RgbaImage, max_width: u32) -> RgbaImage {
    if img.width() <= max_width {
        img
    } else {
        resize_to_width(&img, max_width)
    }
}
