use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;

use super::SpriteInput;
use crate::error::TilesheetError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Most sprite files accepted for one build
pub const MAX_SPRITE_FILES: usize = 300;

/// Most encoded sprite bytes accepted for one build
pub const MAX_TOTAL_BYTES: u64 = 200 * 1024 * 1024;

/// Expand input paths into an ordered list of image files.
///
/// Files are kept in the order given, whatever their extension, so that
/// undecodable inputs surface in the build report. Directories are walked
/// recursively, keeping supported image files sorted by path.
pub fn collect_image_paths(inputs: &[impl AsRef<Path>]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(TilesheetError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            paths.push(path.to_path_buf());
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_from_directory(path, &mut found)?;
            found.sort();
            paths.extend(found);
        }
    }

    Ok(paths)
}

fn collect_from_directory(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_file() && is_supported_image(&path) {
            paths.push(path);
        } else if path.is_dir() {
            collect_from_directory(&path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read files into named build inputs, preserving order.
///
/// The input name is the file name with its extension.
pub fn load_inputs(paths: &[PathBuf]) -> Result<Vec<SpriteInput>> {
    debug!("Reading {} files...", paths.len());

    paths
        .par_iter()
        .map(|path| -> Result<SpriteInput> {
            let bytes = std::fs::read(path).map_err(|e| TilesheetError::InputRead {
                path: path.clone(),
                source: e,
            })?;
            Ok(SpriteInput::new(input_name(path), bytes))
        })
        .collect()
}

/// Name a build input after its file name, extension included
pub fn input_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Reject sprite sets that exceed the per-build file count or byte limits
pub fn check_input_limits(inputs: &[SpriteInput]) -> Result<(), TilesheetError> {
    if inputs.is_empty() {
        return Err(TilesheetError::NoImages);
    }
    if inputs.len() > MAX_SPRITE_FILES {
        return Err(TilesheetError::TooManyInputs {
            count: inputs.len(),
            max: MAX_SPRITE_FILES,
        });
    }

    let total: u64 = inputs.iter().map(|i| i.bytes.len() as u64).sum();
    if total > MAX_TOTAL_BYTES {
        return Err(TilesheetError::InputsTooLarge {
            bytes: total,
            max: MAX_TOTAL_BYTES,
        });
    }

    info!("Loaded {} sprites ({} bytes)", inputs.len(), total);
    Ok(())
}
