//! Configuration module for Nestling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::lemmy::DEFAULT_INSTANCE;
use crate::models::CommentSort;
use crate::paths;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Lemmy instance to read from
    #[serde(default = "default_instance")]
    pub instance: String,

    /// Sort order for new thread views
    #[serde(default)]
    pub default_sort: CommentSort,

    /// How many reply levels one request fetches
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of comments to fetch per request
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Column at which comment bodies wrap
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

fn default_instance() -> String {
    DEFAULT_INSTANCE.to_string()
}

fn default_max_depth() -> u32 {
    8
}

fn default_page_limit() -> u32 {
    50
}

fn default_wrap_width() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance: default_instance(),
            default_sort: CommentSort::default(),
            max_depth: default_max_depth(),
            page_limit: default_page_limit(),
            wrap_width: default_wrap_width(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            instance: "https://beehaw.org".to_string(),
            default_sort: CommentSort::Top,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_sort = \"new\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_sort, CommentSort::New);
        assert_eq!(config.instance, DEFAULT_INSTANCE);
        assert_eq!(config.max_depth, 8);
    }
}
