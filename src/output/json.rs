use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::atlas::{Atlas, BuildReport};
use crate::error::TilesheetError;
use crate::sprite::PlacedSprite;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    meta: Meta,
    image: &'a str,
    size: Size,
    tile_size: u32,
    columns: u32,
    rows: u32,
    /// Written image width over full atlas width
    scale: f64,
    sprites: Vec<JsonSprite<'a>>,
    report: &'a BuildReport,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonSprite<'a> {
    name: &'a str,
    tile: Frame,
    frame: Frame,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Everything that goes into the metadata file for one written atlas image
pub struct AtlasMetadata<'a> {
    pub atlas: &'a Atlas,
    pub report: &'a BuildReport,
    /// File name of the written image
    pub image: String,
    /// Dimensions of the written image (smaller than the atlas for previews)
    pub image_size: (u32, u32),
}

impl<'a> AtlasMetadata<'a> {
    pub fn new(atlas: &'a Atlas, report: &'a BuildReport, image: impl Into<String>) -> Self {
        Self {
            atlas,
            report,
            image: image.into(),
            image_size: (atlas.width, atlas.height),
        }
    }

    pub fn image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = (width, height);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let atlas = self.atlas;
        let (w, h) = self.image_size;
        let scale = if atlas.width == 0 {
            1.0
        } else {
            f64::from(w) / f64::from(atlas.width)
        };

        let output = JsonOutput {
            meta: Meta {
                app: "tilesheet",
                version: env!("CARGO_PKG_VERSION"),
                format: "rgba8888",
            },
            image: &self.image,
            size: Size { w, h },
            tile_size: atlas.tile_size,
            columns: atlas.columns,
            rows: atlas.rows,
            scale,
            sprites: atlas.sprites.iter().map(sprite_to_json).collect(),
            report: self.report,
        };
        serde_json::to_string_pretty(&output)
    }
}

/// Write `<base_name>.json` into `output_dir`, returning its path
pub fn write_json(metadata: &AtlasMetadata<'_>, output_dir: &Path, base_name: &str) -> Result<PathBuf> {
    let json_path = output_dir.join(format!("{}.json", base_name));
    let content = metadata.to_json()?;

    fs::write(&json_path, content).map_err(|e| TilesheetError::OutputWrite {
        path: json_path.clone(),
        source: e,
    })?;

    Ok(json_path)
}

fn sprite_to_json(sprite: &PlacedSprite) -> JsonSprite<'_> {
    JsonSprite {
        name: &sprite.name,
        tile: Frame {
            x: sprite.tile_x,
            y: sprite.tile_y,
            w: sprite.tiles_wide,
            h: sprite.tiles_high,
        },
        frame: Frame {
            x: sprite.x,
            y: sprite.y,
            w: sprite.width,
            h: sprite.height,
        },
    }
}
