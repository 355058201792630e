use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use super::types::{CONFIG_VERSION, TilesheetConfig};
use crate::error::TilesheetError;

/// A parsed project file plus the directory its relative paths hang off.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TilesheetConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Read, parse and check a project file.
    ///
    /// Files written by a newer version and out-of-range `params` are
    /// rejected here, before any image is read.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: TilesheetConfig =
            serde_json::from_str(&content).map_err(|e| TilesheetError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        if config.version > CONFIG_VERSION {
            return Err(TilesheetError::InvalidConfig {
                field: "version",
                message: format!(
                    "{} is newer than the supported {}",
                    config.version, CONFIG_VERSION
                ),
            })
            .with_context(|| format!("unsupported config file: {}", path.display()));
        }
        config
            .params
            .validate()
            .with_context(|| format!("bad params in {}", path.display()))?;

        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self { config, config_dir })
    }

    /// Sprite paths in listed order, globs expanded
    pub fn resolve_sprites(&self) -> Result<Vec<PathBuf>> {
        expand_all(&self.config_dir, &self.config.sprites)
    }

    /// Shadow paths in listed order, globs expanded
    pub fn resolve_shadows(&self) -> Result<Vec<PathBuf>> {
        expand_all(&self.config_dir, &self.config.shadows)
    }

    pub fn resolve_background(&self) -> Option<PathBuf> {
        self.config
            .background
            .as_deref()
            .map(|bg| self.config_dir.join(bg))
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

fn expand_all(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        paths.extend(expand(base, pattern)?);
    }
    Ok(paths)
}

/// Expand one entry relative to `base`. Globs come back sorted by path;
/// plain paths pass through untouched, existing or not.
fn expand(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let joined = base.join(pattern);
    if !is_glob_pattern(pattern) {
        return Ok(vec![joined]);
    }

    let matches = glob::glob(&joined.to_string_lossy())
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to read glob entry: {}", pattern))?;
    if matches.is_empty() {
        warn!("Pattern {} matched no files", pattern);
    }
    Ok(matches)
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
