use std::str::FromStr;

use image::{Rgba, RgbaImage};

use crate::error::TilesheetError;

/// Largest per-channel difference still treated as the key color
pub const COLOR_KEY_TOLERANCE: u8 = 3;

/// An RGB color to knock out of sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorKey {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Check a pixel against the key, ignoring alpha
    pub fn matches(&self, pixel: &Rgba<u8>, tolerance: u8) -> bool {
        self.r.abs_diff(pixel[0]) <= tolerance
            && self.g.abs_diff(pixel[1]) <= tolerance
            && self.b.abs_diff(pixel[2]) <= tolerance
    }
}

impl FromStr for ColorKey {
    type Err = TilesheetError;

    /// Parse `rrggbb` or `#rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TilesheetError::InvalidColor(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_e| TilesheetError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Make every pixel close to `key` fully transparent
pub fn remove_color_key(mut img: RgbaImage, key: ColorKey, tolerance: u8) -> RgbaImage {
    for pixel in img.pixels_mut() {
        if key.matches(pixel, tolerance) {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
    img
}
