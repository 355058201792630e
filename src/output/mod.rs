mod format;
mod json;

pub use format::{encode_png, save_png};
pub use json::{AtlasMetadata, write_json};

/// File name of the written atlas image
pub fn atlas_png_filename(base_name: &str, preview: bool) -> String {
    if preview {
        format!("{}_preview.png", base_name)
    } else {
        format!("{}.png", base_name)
    }
}
