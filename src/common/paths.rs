use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the broll config directory
pub fn broll_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("broll");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

pub fn broll_config_file() -> Result<PathBuf> {
    Ok(broll_config_dir()?.join("broll.toml"))
}
