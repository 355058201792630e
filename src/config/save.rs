use std::path::Path;

use anyhow::{Context, Result, bail};

use super::types::TilesheetConfig;

/// Write a project file as pretty JSON.
///
/// An existing file is only replaced when `overwrite` is set.
pub fn save_config(config: &TilesheetConfig, path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut content =
        serde_json::to_string_pretty(config).context("failed to serialize config to JSON")?;
    content.push('\n');
    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))
}

/// Re-root a path or glob pattern on the directory of the config file.
///
/// Patterns outside `config_dir` (or when it is empty) are stored as given.
pub fn relative_pattern(pattern: &str, config_dir: &Path) -> String {
    if config_dir.as_os_str().is_empty() {
        return pattern.to_string();
    }
    match Path::new(pattern).strip_prefix(config_dir) {
        Ok(rest) => rest.to_string_lossy().into_owned(),
        Err(_) => pattern.to_string(),
    }
}
