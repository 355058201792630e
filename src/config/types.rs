use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::TilesheetError;
use crate::sprite::ColorKey;

/// Newest project file version this build reads
pub const CONFIG_VERSION: u32 = 1;

/// What to do with a sprite that has no matching shadow image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum MissingShadowPolicy {
    /// Process the sprite without an image shadow
    #[default]
    SkipShadow,
    /// Leave the sprite out and report it
    IgnoreSprite,
    /// Abort the whole build
    Fail,
}

/// Parameters for one atlas build.
///
/// Field names serialize in camelCase (`tileSize`, `useShadowImages`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtlasParams {
    /// Tile edge length in pixels (1-512)
    pub tile_size: u32,
    /// Atlas width in tiles (1-20)
    pub width: u32,
    /// Keep every Nth sprite (>= 1)
    pub sample: u32,
    /// Soft outline width in pixels (0-50, 0 disables)
    pub outline: u32,
    /// Hex color to make transparent, e.g. "#ff00ff"
    pub remove_color: Option<String>,
    /// Size of the synthesized shadow relative to the sprite (0-5, 0 disables)
    pub shadow_scale: f32,
    /// Use separately supplied shadow images instead of synthesizing
    pub use_shadow_images: bool,
    /// Handling of sprites without a shadow image
    pub missing_shadow_policy: MissingShadowPolicy,
    /// Put the background image behind every sprite
    pub use_background: bool,
    /// Widest preview image in pixels
    pub preview_max_width: u32,
}

impl Default for AtlasParams {
    fn default() -> Self {
        Self {
            tile_size: 52,
            width: 6,
            sample: 1,
            outline: 0,
            remove_color: None,
            shadow_scale: 0.0,
            use_shadow_images: false,
            missing_shadow_policy: MissingShadowPolicy::SkipShadow,
            use_background: false,
            preview_max_width: 1024,
        }
    }
}

impl AtlasParams {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), TilesheetError> {
        fn invalid(field: &'static str, message: &str) -> TilesheetError {
            TilesheetError::InvalidConfig {
                field,
                message: message.to_string(),
            }
        }

        if !(1..=512).contains(&self.tile_size) {
            return Err(invalid("tileSize", "must be between 1 and 512"));
        }
        if !(1..=20).contains(&self.width) {
            return Err(invalid("width", "must be between 1 and 20"));
        }
        if self.sample == 0 {
            return Err(invalid("sample", "must be positive"));
        }
        if self.outline > 50 {
            return Err(invalid("outline", "must be between 0 and 50"));
        }
        if !self.shadow_scale.is_finite() || !(0.0..=5.0).contains(&self.shadow_scale) {
            return Err(invalid("shadowScale", "must be between 0 and 5"));
        }
        if self.preview_max_width == 0 {
            return Err(invalid("previewMaxWidth", "must be positive"));
        }
        self.color_key()?;
        Ok(())
    }

    /// Parsed `remove_color`, if set
    pub fn color_key(&self) -> Result<Option<ColorKey>, TilesheetError> {
        self.remove_color
            .as_deref()
            .map(str::parse::<ColorKey>)
            .transpose()
    }
}

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Project configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TilesheetConfig {
    /// Project file format version
    pub version: u32,
    /// Sprite file paths or glob patterns, in atlas order
    pub sprites: Vec<String>,
    /// Shadow image paths or glob patterns
    pub shadows: Vec<String>,
    /// Background image path
    pub background: Option<String>,
    /// Output directory for atlas files
    pub output_dir: String,
    /// Base name for output files (atlas.png, atlas.json)
    pub name: String,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Build parameters
    pub params: AtlasParams,
}

impl Default for TilesheetConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            sprites: Vec::new(),
            shadows: Vec::new(),
            background: None,
            output_dir: ".".to_string(),
            name: "atlas".to_string(),
            compress: None,
            params: AtlasParams::default(),
        }
    }
}
