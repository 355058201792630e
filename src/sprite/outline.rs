use image::{Rgba, RgbaImage, imageops};

/// Blur radius applied to the outline edge
pub const OUTLINE_FEATHER: f32 = 1.0;

/// Draw a soft black outline behind the opaque parts of a sprite.
///
/// The alpha channel is dilated by `width` pixels (square window), the ring
/// between dilated and original alpha is blurred by `feather`, and the sprite
/// is composited over it. Output size equals input size.
pub fn add_soft_outline(img: &RgbaImage, width: u32, feather: f32) -> RgbaImage {
    if width == 0 {
        return img.clone();
    }

    let (w, h) = img.dimensions();
    let alpha: Vec<u8> = img.pixels().map(|p| p[3]).collect();
    let dilated = dilate(&alpha, w as usize, h as usize, width as usize);

    let mut outline = RgbaImage::new(w, h);
    for ((pixel, &orig), &grown) in outline.pixels_mut().zip(&alpha).zip(&dilated) {
        *pixel = Rgba([0, 0, 0, grown.abs_diff(orig)]);
    }

    let mut outline = if feather > 0.0 {
        imageops::blur(&outline, feather)
    } else {
        outline
    };
    imageops::overlay(&mut outline, img, 0, 0);
    outline
}

/// Square max filter, done as a horizontal then a vertical pass
fn dilate(alpha: &[u8], w: usize, h: usize, radius: usize) -> Vec<u8> {
    let mut horizontal = vec![0u8; alpha.len()];
    for y in 0..h {
        let row = &alpha[y * w..(y + 1) * w];
        for x in 0..w {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(w - 1);
            horizontal[y * w + x] = row[lo..=hi].iter().copied().max().unwrap_or(0);
        }
    }

    let mut out = vec![0u8; alpha.len()];
    for x in 0..w {
        for y in 0..h {
            let lo = y.saturating_sub(radius);
            let hi = (y + radius).min(h - 1);
            out[y * w + x] = (lo..=hi).map(|yy| horizontal[yy * w + x]).max().unwrap_or(0);
        }
    }
    out
}
