use std::collections::HashMap;

use image::{ImageResult, RgbaImage};
use log::{debug, info, warn};
use rayon::prelude::*;

use super::{Atlas, BuildReport, IgnoreReason, IgnoredSprite};
use crate::config::{AtlasParams, MissingShadowPolicy};
use crate::error::TilesheetError;
use crate::matching::{ShadowMatches, match_shadows};
use crate::packing::GreedyPacker;
use crate::sprite::{
    COLOR_KEY_TOLERANCE, ColorKey, OUTLINE_FEATHER, SHADOW_BLUR_RADIUS, SpriteInput,
    add_image_shadow, add_scaled_shadow, add_soft_outline, apply_background,
    normalize_to_tile, pixels_equal, remove_color_key, resize_exact,
};

/// Drives one atlas build.
///
/// A build is stateless: every call to [`AtlasBuilder::build`] gets its own
/// grid and report, so one builder can serve concurrent builds.
pub struct AtlasBuilder {
    params: AtlasParams,
}

/// A finished atlas and the diagnostics gathered while building it
#[derive(Debug)]
pub struct BuiltAtlas {
    pub atlas: Atlas,
    pub report: BuildReport,
}

/// Per-sprite progress through the pipeline
enum Step<T> {
    Keep(T),
    Skip(IgnoredSprite),
}

impl<T> Step<T> {
    fn skip(name: &str, reason: IgnoreReason) -> Self {
        Step::Skip(IgnoredSprite::new(name, reason))
    }
}

/// A decoded sprite cleared for pixel processing
struct SpriteJob<'a> {
    name: &'a str,
    image: RgbaImage,
    shadow: Option<&'a SpriteInput>,
}

/// A tile-normalized sprite ready for placement
struct Prepared<'a> {
    name: &'a str,
    image: RgbaImage,
    tiles_wide: u32,
    tiles_high: u32,
}

/// Shadow resolution plus the shadow files it refers to
struct ShadowIndex<'a> {
    matches: ShadowMatches,
    files: HashMap<&'a str, &'a SpriteInput>,
}

impl<'a> ShadowIndex<'a> {
    fn new(sprites: &[SpriteInput], shadows: &'a [SpriteInput]) -> Self {
        let sprite_names: Vec<&str> = sprites.iter().map(|s| s.name.as_str()).collect();
        let shadow_names: Vec<&str> = shadows.iter().map(|s| s.name.as_str()).collect();
        Self {
            matches: match_shadows(&sprite_names, &shadow_names),
            files: shadows.iter().map(|s| (s.name.as_str(), s)).collect(),
        }
    }

    fn shadow_for(&self, sprite_name: &str) -> Option<&'a SpriteInput> {
        self.matches
            .shadow_for(sprite_name)
            .and_then(|shadow| self.files.get(shadow).copied())
    }
}

/// Accumulator for the ordered staging pass: staged sprites so far and the
/// last decoded sprite kept for duplicate comparison.
type Staging<'a> = (Vec<Step<SpriteJob<'a>>>, Option<RgbaImage>);

impl AtlasBuilder {
    pub fn new(params: AtlasParams) -> Self {
        Self { params }
    }

    /// Build an atlas from sprites in the given order.
    ///
    /// `shadows` is only consulted when `use_shadow_images` is set, and
    /// `background` only when `use_background` is set. Per-sprite failures end
    /// up in the report; configuration errors, a missing shadow under the
    /// `fail` policy, and an empty result abort the build.
    pub fn build(
        &self,
        sprites: &[SpriteInput],
        shadows: &[SpriteInput],
        background: Option<&SpriteInput>,
    ) -> Result<BuiltAtlas, TilesheetError> {
        let params = &self.params;
        params.validate()?;
        let color_key = params.color_key()?;
        let mut report = BuildReport::default();

        let shadow_index = if params.use_shadow_images {
            let index = ShadowIndex::new(sprites, shadows);
            report.record_shadow_matches(&index.matches);
            info!(
                "Matched shadows for {}/{} sprites ({} ambiguous)",
                index.matches.matches.len(),
                sprites.len(),
                index.matches.ambiguous.len()
            );
            Some(index)
        } else {
            None
        };

        let background_tile = self.background_tile(background)?;

        let sampled: Vec<&SpriteInput> = sprites.iter().step_by(params.sample as usize).collect();
        debug!(
            "Processing {} of {} sprites (sample every {})",
            sampled.len(),
            sprites.len(),
            params.sample
        );

        let decoded: Vec<(&SpriteInput, ImageResult<RgbaImage>)> = sampled
            .par_iter()
            .map(|&input| (input, input.decode()))
            .collect();

        let staged = self.stage(decoded, shadow_index.as_ref())?;

        let prepared: Vec<Step<Prepared>> = staged
            .into_par_iter()
            .map(|step| match step {
                Step::Keep(job) => self.prepare(job, color_key, background_tile.as_ref()),
                Step::Skip(ignored) => Step::Skip(ignored),
            })
            .collect();

        let atlas = self.assemble(prepared, &mut report)?;

        info!(
            "Atlas: {}x{} ({}x{} tiles) with {} sprites ({:.1}% occupancy), {} ignored",
            atlas.width,
            atlas.height,
            atlas.columns,
            atlas.rows,
            atlas.sprites.len(),
            atlas.occupancy * 100.0,
            report.ignored.len()
        );

        Ok(BuiltAtlas { atlas, report })
    }

    /// Decode and shrink the background to a single tile
    fn background_tile(
        &self,
        background: Option<&SpriteInput>,
    ) -> Result<Option<RgbaImage>, TilesheetError> {
        if !self.params.use_background {
            return Ok(None);
        }
        let Some(background) = background else {
            warn!("Background requested but no background image was supplied");
            return Ok(None);
        };

        let image = background
            .decode()
            .map_err(TilesheetError::BackgroundDecode)?;
        let size = self.params.tile_size;
        Ok(Some(resize_exact(image, size, size)))
    }

    /// Ordered pass: decode failures, duplicate suppression, shadow policy.
    fn stage<'a>(
        &self,
        decoded: Vec<(&'a SpriteInput, ImageResult<RgbaImage>)>,
        shadows: Option<&ShadowIndex<'a>>,
    ) -> Result<Vec<Step<SpriteJob<'a>>>, TilesheetError> {
        let capacity = decoded.len();
        let (staged, _) = decoded.into_iter().try_fold(
            (Vec::with_capacity(capacity), None),
            |(mut staged, previous): Staging<'a>,
             (input, decoded)|
             -> Result<Staging<'a>, TilesheetError> {
                let image = match decoded {
                    Ok(image) => image,
                    Err(e) => {
                        let reason = IgnoreReason::ProcessingError(e.to_string());
                        staged.push(Step::skip(&input.name, reason));
                        return Ok((staged, previous));
                    }
                };

                if previous.as_ref().is_some_and(|p| pixels_equal(p, &image)) {
                    staged.push(Step::skip(&input.name, IgnoreReason::Duplicate));
                    return Ok((staged, previous));
                }

                let shadow = match shadows {
                    Some(index) => match index.shadow_for(&input.name) {
                        Some(shadow) => Some(shadow),
                        None => match self.params.missing_shadow_policy {
                            MissingShadowPolicy::SkipShadow => None,
                            MissingShadowPolicy::IgnoreSprite => {
                                staged.push(Step::skip(&input.name, IgnoreReason::MissingShadow));
                                return Ok((staged, Some(image)));
                            }
                            MissingShadowPolicy::Fail => {
                                return Err(TilesheetError::MissingShadow {
                                    sprite: input.name.clone(),
                                });
                            }
                        },
                    },
                    None => None,
                };

                staged.push(Step::Keep(SpriteJob {
                    name: &input.name,
                    image: image.clone(),
                    shadow,
                }));
                Ok((staged, Some(image)))
            },
        )?;
        Ok(staged)
    }

    /// Pixel pass for one sprite. Independent of every other sprite.
    fn prepare<'a>(
        &self,
        job: SpriteJob<'a>,
        color_key: Option<ColorKey>,
        background: Option<&RgbaImage>,
    ) -> Step<Prepared<'a>> {
        let params = &self.params;
        let mut image = job.image;

        if let Some(key) = color_key {
            image = remove_color_key(image, key, COLOR_KEY_TOLERANCE);
        }

        if params.outline > 0 {
            image = add_soft_outline(&image, params.outline, OUTLINE_FEATHER);
        }

        // Image shadows take precedence; the scaled shadow is the fallback
        if let Some(shadow) = job.shadow {
            match shadow.decode() {
                Ok(shadow_image) => image = add_image_shadow(&image, &shadow_image),
                Err(e) => {
                    let cause = format!("shadow '{}': {}", shadow.name, e);
                    return Step::skip(job.name, IgnoreReason::ProcessingError(cause));
                }
            }
        } else if params.shadow_scale > 0.0 {
            image = add_scaled_shadow(&image, params.shadow_scale, SHADOW_BLUR_RADIUS);
        }

        let Some(image) = normalize_to_tile(image, params.tile_size) else {
            let cause = "sprite is too wide to fill a whole tile row".to_string();
            return Step::skip(job.name, IgnoreReason::ProcessingError(cause));
        };

        let (tiles_wide, tiles_high) = match footprint(&image, params.tile_size, params.width) {
            Ok(size) => size,
            Err(reason) => return Step::skip(job.name, reason),
        };

        let image = match background {
            Some(tile) => apply_background(&image, tile, params.tile_size),
            None => image,
        };

        Step::Keep(Prepared {
            name: job.name,
            image,
            tiles_wide,
            tiles_high,
        })
    }

    /// Sequential placement in input order, then canvas assembly
    fn assemble(
        &self,
        prepared: Vec<Step<Prepared>>,
        report: &mut BuildReport,
    ) -> Result<Atlas, TilesheetError> {
        let mut packer = GreedyPacker::new(self.params.width);
        let mut placed = Vec::new();

        for step in prepared {
            match step {
                Step::Skip(ignored) => {
                    debug!("Ignoring {}: {}", ignored.name, ignored.reason);
                    report.ignore(ignored);
                }
                Step::Keep(sprite) => {
                    match packer.insert(sprite.tiles_wide, sprite.tiles_high) {
                        Some(rect) => {
                            debug!(
                                "Placed {} ({}x{} tiles) at ({}, {})",
                                sprite.name, rect.width, rect.height, rect.x, rect.y
                            );
                            placed.push((rect, sprite));
                        }
                        None => {
                            report.ignore(IgnoredSprite::new(sprite.name, IgnoreReason::TooWide))
                        }
                    }
                }
            }
        }

        if placed.is_empty() {
            return Err(TilesheetError::NoSprites);
        }

        let mut atlas = Atlas::new(self.params.tile_size, self.params.width, packer.height());
        atlas.occupancy = packer.occupancy();
        for (rect, sprite) in &placed {
            atlas.paste(sprite.name, *rect, &sprite.image);
        }

        Ok(atlas)
    }
}

/// Tile footprint of a normalized sprite.
///
/// Fails with `SizeAlignment` if either side is not a multiple of
/// `tile_size`, and with `TooWide` if the sprite spans more than `max_width`
/// tiles.
pub fn footprint(
    image: &RgbaImage,
    tile_size: u32,
    max_width: u32,
) -> Result<(u32, u32), IgnoreReason> {
    let (w, h) = image.dimensions();
    if w % tile_size != 0 || h % tile_size != 0 {
        return Err(IgnoreReason::SizeAlignment);
    }

    let tiles = (w / tile_size, h / tile_size);
    if tiles.0 > max_width {
        return Err(IgnoreReason::TooWide);
    }
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn sprite(name: &str, w: u32, h: u32, color: Rgba<u8>) -> SpriteInput {
        SpriteInput::new(name, png_bytes(&RgbaImage::from_pixel(w, h, color)))
    }

    fn params(tile_size: u32, width: u32) -> AtlasParams {
        AtlasParams {
            tile_size,
            width,
            ..Default::default()
        }
    }

    fn build(params: AtlasParams, sprites: &[SpriteInput]) -> Result<BuiltAtlas, TilesheetError> {
        AtlasBuilder::new(params).build(sprites, &[], None)
    }

    fn positions(atlas: &Atlas) -> Vec<(&str, u32, u32)> {
        atlas
            .sprites
            .iter()
            .map(|s| (s.name.as_str(), s.tile_x, s.tile_y))
            .collect()
    }

    fn ignored(report: &BuildReport) -> Vec<(&str, String)> {
        report
            .ignored
            .iter()
            .map(|i| (i.name.as_str(), i.reason.to_string()))
            .collect()
    }

    #[test]
    fn test_single_tile_sprite() {
        let built = build(params(52, 6), &[sprite("test1.png", 52, 52, RED)]).unwrap();

        assert_eq!(built.atlas.image.dimensions(), (52 * 6, 52));
        assert_eq!(positions(&built.atlas), vec![("test1.png", 0, 0)]);
        assert_eq!(*built.atlas.image.get_pixel(10, 10), RED);
        assert_eq!(built.atlas.image.get_pixel(60, 10)[3], 0);
        assert!(built.report.is_clean());
    }

    #[test]
    fn test_multiple_sprites_fill_a_row() {
        let sprites = [
            sprite("red.png", 52, 52, RED),
            sprite("green.png", 52, 52, GREEN),
            sprite("blue.png", 52, 52, BLUE),
        ];
        let built = build(params(52, 3), &sprites).unwrap();

        assert_eq!(built.atlas.image.dimensions(), (52 * 3, 52));
        assert_eq!(
            positions(&built.atlas),
            vec![("red.png", 0, 0), ("green.png", 1, 0), ("blue.png", 2, 0)]
        );
        assert_eq!(*built.atlas.image.get_pixel(52 + 5, 5), GREEN);
    }

    #[test]
    fn test_sprites_are_resized_to_tile_width() {
        let sprites = [
            sprite("tall.png", 30, 61, RED),
            sprite("small.png", 13, 12, GREEN),
        ];
        let built = build(params(16, 2), &sprites).unwrap();

        let tall = &built.atlas.sprites[0];
        assert_eq!((tall.width, tall.height), (16, 32));
        assert_eq!((tall.tiles_wide, tall.tiles_high), (1, 2));
        assert_eq!(positions(&built.atlas), vec![("tall.png", 0, 0), ("small.png", 1, 0)]);
        assert_eq!(built.atlas.rows, 2);
        assert_eq!(built.atlas.image.dimensions(), (32, 32));
    }

    #[test]
    fn test_sampling_skips_silently() {
        let sprites = [
            sprite("img1.png", 52, 52, RED),
            sprite("img2.png", 52, 52, GREEN),
            sprite("img3.png", 52, 52, BLUE),
            sprite("img4.png", 52, 52, Rgba([255, 255, 0, 255])),
        ];
        let built = build(
            AtlasParams {
                sample: 2,
                ..params(52, 6)
            },
            &sprites,
        )
        .unwrap();

        assert_eq!(built.atlas.image.dimensions(), (52 * 6, 52));
        assert_eq!(
            positions(&built.atlas),
            vec![("img1.png", 0, 0), ("img3.png", 1, 0)]
        );
        assert!(built.report.is_clean());
    }

    #[test]
    fn test_consecutive_duplicates_are_ignored() {
        let sprites = [
            sprite("a.png", 52, 52, RED),
            sprite("b.png", 52, 52, RED),
            sprite("c.png", 52, 52, BLUE),
            sprite("d.png", 52, 52, RED),
        ];
        let built = build(params(52, 6), &sprites).unwrap();

        assert_eq!(ignored(&built.report), vec![("b.png", "duplicate".to_string())]);
        // d.png matches a.png, but not the sprite right before it
        assert_eq!(
            positions(&built.atlas),
            vec![("a.png", 0, 0), ("c.png", 1, 0), ("d.png", 2, 0)]
        );
    }

    #[test]
    fn test_decode_failure_is_reported_and_build_continues() {
        let sprites = [
            SpriteInput::new("notes.txt", b"This is not an image".to_vec()),
            sprite("ok.png", 52, 52, RED),
        ];
        let built = build(params(52, 6), &sprites).unwrap();

        let reason = built.report.reason_for("notes.txt").unwrap();
        assert!(reason.to_string().starts_with("processing error: "));
        assert_eq!(positions(&built.atlas), vec![("ok.png", 0, 0)]);
    }

    #[test]
    fn test_failed_decode_does_not_reset_duplicate_tracking() {
        let sprites = [
            sprite("a.png", 52, 52, RED),
            SpriteInput::new("broken.png", vec![0x89, b'P', b'N', b'G']),
            sprite("b.png", 52, 52, RED),
        ];
        let built = build(params(52, 6), &sprites).unwrap();

        let reasons = ignored(&built.report);
        assert_eq!(reasons.len(), 2);
        assert_eq!(reasons[0].0, "broken.png");
        assert_eq!(reasons[1], ("b.png", "duplicate".to_string()));
    }

    #[test]
    fn test_sprite_ignored_for_missing_shadow_still_sets_previous() {
        let sprites = [
            sprite("a.png", 8, 8, RED),
            sprite("b.png", 8, 8, RED),
            sprite("c.png", 8, 8, GREEN),
        ];
        let shadows = [
            sprite("b_shadow.png", 8, 8, Rgba([0, 0, 0, 255])),
            sprite("c_shadow.png", 8, 8, Rgba([0, 0, 0, 255])),
        ];

        let built = AtlasBuilder::new(shadow_params(MissingShadowPolicy::IgnoreSprite))
            .build(&sprites, &shadows, None)
            .unwrap();

        assert_eq!(
            ignored(&built.report),
            vec![
                ("a.png", "missing shadow".to_string()),
                ("b.png", "duplicate".to_string())
            ]
        );
        assert_eq!(positions(&built.atlas), vec![("c.png", 0, 0)]);
    }

    #[test]
    fn test_only_duplicates_of_an_ignored_sprite_is_fatal() {
        let sprites = [sprite("a.png", 8, 8, RED), sprite("b.png", 8, 8, RED)];
        let shadows = [sprite("b_shadow.png", 8, 8, Rgba([0, 0, 0, 255]))];

        let result = AtlasBuilder::new(shadow_params(MissingShadowPolicy::IgnoreSprite))
            .build(&sprites, &shadows, None);
        assert!(matches!(result, Err(TilesheetError::NoSprites)));
    }

    #[test]
    fn test_sprite_dropped_during_processing_still_sets_previous() {
        let sprites = [
            sprite("wide.png", 8 * 5, 8, RED),
            sprite("wide_copy.png", 8 * 5, 8, RED),
            sprite("ok.png", 8, 8, GREEN),
        ];
        let built = build(params(8, 4), &sprites).unwrap();

        let reasons = ignored(&built.report);
        assert_eq!(reasons.len(), 2);
        assert_eq!(reasons[0].0, "wide.png");
        assert!(reasons[0].1.starts_with("processing error: "));
        assert_eq!(reasons[1], ("wide_copy.png", "duplicate".to_string()));
        assert_eq!(positions(&built.atlas), vec![("ok.png", 0, 0)]);
    }

    #[test]
    fn test_no_surviving_sprites_is_fatal() {
        let result = build(
            params(52, 6),
            &[SpriteInput::new("notes.txt", b"nope".to_vec())],
        );
        assert!(matches!(result, Err(TilesheetError::NoSprites)));
    }

    #[test]
    fn test_very_wide_sprite_cannot_be_placed() {
        let result = build(params(52, 3), &[sprite("wide.png", 52 * 5, 52, RED)]);
        assert!(matches!(result, Err(TilesheetError::NoSprites)));

        let sprites = [
            sprite("valid.png", 52, 52, RED),
            sprite("wide.png", 52 * 5, 52, GREEN),
        ];
        let built = build(params(52, 3), &sprites).unwrap();
        assert_eq!(positions(&built.atlas), vec![("valid.png", 0, 0)]);
        assert!(built.report.reason_for("wide.png").is_some());
    }

    #[test]
    fn test_footprint_checks() {
        let tile = 52;
        assert_eq!(footprint(&RgbaImage::new(52, 104), tile, 6), Ok((1, 2)));
        assert_eq!(footprint(&RgbaImage::new(52 * 6, 52), tile, 6), Ok((6, 1)));
        assert_eq!(
            footprint(&RgbaImage::new(52 * 7, 52), tile, 6),
            Err(IgnoreReason::TooWide)
        );
        assert_eq!(
            footprint(&RgbaImage::new(52, 60), tile, 6),
            Err(IgnoreReason::SizeAlignment)
        );
        assert_eq!(
            footprint(&RgbaImage::new(50, 52), tile, 6),
            Err(IgnoreReason::SizeAlignment)
        );
    }

    #[test]
    fn test_invalid_params_rejected_before_build() {
        let result = build(params(0, 6), &[sprite("a.png", 52, 52, RED)]);
        assert!(matches!(
            result,
            Err(TilesheetError::InvalidConfig {
                field: "tileSize",
                ..
            })
        ));
    }

    #[test]
    fn test_color_key_removal() {
        let built = build(
            AtlasParams {
                remove_color: Some("#ff0000".to_string()),
                ..params(52, 6)
            },
            &[sprite("red.png", 52, 52, RED)],
        )
        .unwrap();

        assert_eq!(built.atlas.image.get_pixel(26, 26)[3], 0);
    }

    #[test]
    fn test_outline_and_scaled_shadow_keep_tile_size() {
        let built = build(
            AtlasParams {
                outline: 2,
                shadow_scale: 1.1,
                ..params(52, 6)
            },
            &[sprite("red.png", 52, 52, RED)],
        )
        .unwrap();

        let placed = &built.atlas.sprites[0];
        assert_eq!((placed.width, placed.height), (52, 52));
        assert_eq!(built.atlas.image.dimensions(), (312, 52));
    }

    #[test]
    fn test_background_fills_behind_sprites() {
        let mut img = RgbaImage::new(16, 16);
        img.put_pixel(0, 0, RED);
        let sprites = [SpriteInput::new("hollow.png", png_bytes(&img))];
        let background = sprite("bg.png", 16, 16, BLUE);

        let built = AtlasBuilder::new(AtlasParams {
            use_background: true,
            ..params(16, 2)
        })
        .build(&sprites, &[], Some(&background))
        .unwrap();

        assert_eq!(*built.atlas.image.get_pixel(0, 0), RED);
        assert_eq!(*built.atlas.image.get_pixel(8, 8), BLUE);
        // Second column has nothing placed in it
        assert_eq!(built.atlas.image.get_pixel(20, 8)[3], 0);
    }

    #[test]
    fn test_background_ignored_unless_enabled() {
        let sprites = [SpriteInput::new("clear.png", png_bytes(&RgbaImage::new(16, 16)))];
        let background = sprite("bg.png", 8, 8, BLUE);

        let built = AtlasBuilder::new(params(16, 1))
            .build(&sprites, &[], Some(&background))
            .unwrap();

        assert_eq!(built.atlas.image.get_pixel(8, 8)[3], 0);
    }

    #[test]
    fn test_bad_background_is_invalid_input() {
        let background = SpriteInput::new("bg.png", b"garbage".to_vec());
        let result = AtlasBuilder::new(AtlasParams {
            use_background: true,
            ..params(16, 1)
        })
        .build(&[sprite("a.png", 16, 16, RED)], &[], Some(&background));

        let err = result.unwrap_err();
        assert!(matches!(err, TilesheetError::BackgroundDecode(_)));
        assert!(err.is_client_error());
    }

    fn shadow_params(policy: MissingShadowPolicy) -> AtlasParams {
        AtlasParams {
            use_shadow_images: true,
            missing_shadow_policy: policy,
            ..params(8, 4)
        }
    }

    #[test]
    fn test_image_shadow_is_composited() {
        let sprites = [SpriteInput::new("Hero.PNG", png_bytes(&RgbaImage::new(8, 8)))];
        let shadows = [sprite("hero_shadow.png", 8, 8, Rgba([0, 0, 0, 255]))];

        let built = AtlasBuilder::new(shadow_params(MissingShadowPolicy::Fail))
            .build(&sprites, &shadows, None)
            .unwrap();

        assert_eq!(*built.atlas.image.get_pixel(4, 4), Rgba([0, 0, 0, 255]));
        assert!(built.report.is_clean());
    }

    #[test]
    fn test_missing_shadow_skip_policy() {
        let built = AtlasBuilder::new(shadow_params(MissingShadowPolicy::SkipShadow))
            .build(&[sprite("orc.png", 8, 8, RED)], &[], None)
            .unwrap();

        assert_eq!(positions(&built.atlas), vec![("orc.png", 0, 0)]);
        assert_eq!(built.report.shadow_missing, vec!["orc.png".to_string()]);
        assert!(built.report.ignored.is_empty());
    }

    #[test]
    fn test_missing_shadow_ignore_policy() {
        let sprites = [sprite("orc.png", 8, 8, RED), sprite("elf.png", 8, 8, GREEN)];
        let shadows = [sprite("elf-shadow.png", 8, 8, Rgba([40, 40, 40, 255]))];

        let built = AtlasBuilder::new(shadow_params(MissingShadowPolicy::IgnoreSprite))
            .build(&sprites, &shadows, None)
            .unwrap();

        assert_eq!(ignored(&built.report), vec![("orc.png", "missing shadow".to_string())]);
        assert_eq!(positions(&built.atlas), vec![("elf.png", 0, 0)]);
    }

    #[test]
    fn test_missing_shadow_fail_policy_aborts() {
        let result = AtlasBuilder::new(shadow_params(MissingShadowPolicy::Fail))
            .build(&[sprite("sprite.png", 8, 8, RED)], &[], None);

        match result {
            Err(err @ TilesheetError::MissingShadow { .. }) => {
                assert_eq!(err.to_string(), "Missing shadow for sprite.png");
                assert!(err.is_client_error());
            }
            other => panic!("expected missing shadow error, got {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_shadow_is_reported_and_used() {
        let sprites = [SpriteInput::new("a.png", png_bytes(&RgbaImage::new(8, 8)))];
        let shadows = [
            sprite("a__shadow.png", 8, 8, Rgba([255, 255, 255, 255])),
            sprite("a_shadow.png", 8, 8, Rgba([0, 0, 0, 255])),
        ];

        let built = AtlasBuilder::new(shadow_params(MissingShadowPolicy::Fail))
            .build(&sprites, &shadows, None)
            .unwrap();

        assert_eq!(built.report.shadow_ambiguous.len(), 1);
        assert_eq!(
            built.report.shadow_ambiguous[0].candidates,
            vec!["a__shadow.png".to_string(), "a_shadow.png".to_string()]
        );
        // The shorter (black) shadow won, not the white one
        assert_eq!(*built.atlas.image.get_pixel(4, 4), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_broken_shadow_file_ignores_sprite() {
        let sprites = [sprite("a.png", 8, 8, RED), sprite("b.png", 8, 8, GREEN)];
        let shadows = [
            SpriteInput::new("a_shadow.png", b"garbage".to_vec()),
            sprite("b_shadow.png", 8, 8, Rgba([0, 0, 0, 255])),
        ];

        let built = AtlasBuilder::new(shadow_params(MissingShadowPolicy::Fail))
            .build(&sprites, &shadows, None)
            .unwrap();

        let reason = built.report.reason_for("a.png").unwrap().to_string();
        assert!(reason.starts_with("processing error: shadow 'a_shadow.png'"));
        assert_eq!(positions(&built.atlas), vec![("b.png", 0, 0)]);
    }

    #[test]
    fn test_shadows_unused_when_disabled() {
        let built = build(
            AtlasParams {
                missing_shadow_policy: MissingShadowPolicy::Fail,
                ..params(8, 4)
            },
            &[sprite("a.png", 8, 8, RED)],
        )
        .unwrap();
        assert!(built.report.is_clean());
    }

    #[test]
    fn test_report_keeps_input_order() {
        let sprites = [
            sprite("first.png", 8, 8, RED),
            SpriteInput::new("second.png", b"junk".to_vec()),
            sprite("third.png", 8, 8, RED),
            sprite("fourth.png", 8 * 9, 8, GREEN),
            SpriteInput::new("fifth.png", b"junk".to_vec()),
        ];
        let built = build(params(8, 4), &sprites).unwrap();

        let names: Vec<_> = built.report.ignored.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["second.png", "third.png", "fourth.png", "fifth.png"]);
    }

    #[test]
    fn test_placements_never_overlap() {
        let heights = [8, 16, 8, 24, 8, 8, 16, 8, 32, 8];
        let sprites: Vec<_> = heights
            .iter()
            .enumerate()
            .map(|(i, &h)| sprite(&format!("s{}.png", i), 8, h, Rgba([i as u8 * 20, 0, 0, 255])))
            .collect();
        let built = build(params(8, 3), &sprites).unwrap();

        let rects: Vec<_> = built
            .atlas
            .sprites
            .iter()
            .map(|s| crate::packing::Rect::new(s.tile_x, s.tile_y, s.tiles_wide, s.tiles_high))
            .collect();
        assert_eq!(rects.len(), heights.len());
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
        assert!(built.atlas.rows * 3 >= heights.iter().map(|h| h / 8).sum::<u32>());
    }

    #[test]
    fn test_preview_of_built_atlas() {
        let built = build(params(52, 6), &[sprite("a.png", 52, 52, RED)]).unwrap();

        let preview = built.atlas.preview(100);
        assert_eq!(preview.dimensions(), (100, 16));
        assert_eq!(built.atlas.preview(1024).dimensions(), (312, 52));
    }
}
