mod background;
mod color_key;
mod loader;
mod outline;
mod resizer;
mod shadow;
mod sprite;

pub use background::apply_background;
pub use color_key::{COLOR_KEY_TOLERANCE, ColorKey, remove_color_key};
pub use loader::{
    MAX_SPRITE_FILES, MAX_TOTAL_BYTES, check_input_limits, collect_image_paths, input_name,
    load_inputs,
};
pub use outline::{OUTLINE_FEATHER, add_soft_outline};
pub use resizer::{
    aspect_multiplier, fit_to_width, normalize_to_tile, resize_exact, resize_to_width,
    round_half_up,
};
pub use shadow::{
    SHADOW_BLUR_RADIUS, SHADOW_LIGHT_THRESHOLD, add_image_shadow, add_scaled_shadow,
    threshold_shadow,
};
pub use sprite::{PlacedSprite, SpriteInput, decode_image, pixels_equal};
