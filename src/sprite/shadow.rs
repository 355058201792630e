use image::{Rgba, RgbaImage, imageops, imageops::FilterType};

use super::resize_exact;

/// Blur radius of synthesized drop shadows
pub const SHADOW_BLUR_RADIUS: f32 = 10.0;

/// Channel value above which a shadow-image pixel counts as background
pub const SHADOW_LIGHT_THRESHOLD: u8 = 180;

/// Synthesize a shadow from the sprite's own silhouette.
///
/// The silhouette is scaled by `scale`, blurred, centered behind the sprite,
/// and clipped to the sprite's original size.
pub fn add_scaled_shadow(img: &RgbaImage, scale: f32, blur_radius: f32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let shadow_w = ((w as f32 * scale) as u32).max(1);
    let shadow_h = ((h as f32 * scale) as u32).max(1);

    let silhouette = RgbaImage::from_fn(w, h, |x, y| Rgba([0, 0, 0, img.get_pixel(x, y)[3]]));
    let mask = imageops::resize(&silhouette, shadow_w, shadow_h, FilterType::Lanczos3);
    let shadow = if blur_radius > 0.0 {
        imageops::blur(&mask, blur_radius)
    } else {
        mask
    };

    let offset_x = (i64::from(w) - i64::from(shadow_w)).div_euclid(2);
    let offset_y = (i64::from(h) - i64::from(shadow_h)).div_euclid(2);

    let mut canvas = RgbaImage::new(w, h);
    imageops::overlay(&mut canvas, &shadow, offset_x, offset_y);
    imageops::overlay(&mut canvas, img, 0, 0);
    canvas
}

/// Turn a painted shadow image into a black alpha mask.
///
/// Light pixels (every channel above `threshold`) become transparent; the
/// rest become black with alpha equal to their darkness.
pub fn threshold_shadow(shadow: &RgbaImage, threshold: u8) -> RgbaImage {
    let mut out = shadow.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        *pixel = if r > threshold && g > threshold && b > threshold {
            Rgba([0, 0, 0, 0])
        } else {
            let gray = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
            Rgba([0, 0, 0, 255 - (gray as u8)])
        };
    }
    out
}

/// Composite a sprite over a shadow supplied as a separate image.
///
/// The shadow is thresholded and stretched to the sprite's size if needed.
pub fn add_image_shadow(img: &RgbaImage, shadow: &RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mask = resize_exact(threshold_shadow(shadow, SHADOW_LIGHT_THRESHOLD), w, h);

    let mut canvas = RgbaImage::new(w, h);
    imageops::overlay(&mut canvas, &mask, 0, 0);
    imageops::overlay(&mut canvas, img, 0, 0);
    canvas
}
