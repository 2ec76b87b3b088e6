use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::config::PartialConfig;

/// Reads a configuration overlay. `.json` files are parsed as JSON,
/// anything else as TOML.
pub fn load_partial_config(path: &Path) -> Result<PartialConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read countdown config from {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let partial = if is_json {
        serde_json::from_str(&data).with_context(|| {
            format!("failed to parse countdown config from {}", path.display())
        })?
    } else {
        toml::from_str(&data).with_context(|| {
            format!("failed to parse countdown config from {}", path.display())
        })?
    };

    log::info!("Loaded countdown config from {}", path.display());
    Ok(partial)
}

/// Platform config location, e.g. `~/.config/rust-countdown/countdown.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "RustCountdown", "rust-countdown")
        .map(|dirs| dirs.config_dir().join("countdown.toml"))
}
