//! Common paths for Nestling data storage
//!
//! Nestling keeps its files under ~/.config/nestling/ on all platforms:
//! - config.toml - User configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the Nestling data directory (~/.config/nestling/)
pub fn nestling_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("nestling");
    fs::create_dir_all(&dir).context("Failed to create nestling directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/nestling/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(nestling_dir()?.join("config.toml"))
}
