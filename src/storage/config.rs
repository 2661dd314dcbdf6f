//! Configuration handling for pj
//!
//! Configuration is stored in `~/.config/pj/config.toml`. Every key is
//! optional:
//!
//! ```toml
//! catalog = "~/notes/projects.yaml"
//! editor = "nvim"
//! default_format = "json"
//! default_sort = "last_accessed"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::SortBy;
use super::paths::{default_catalog_path, expand_path};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Catalog file, overriding the default data location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Editor command for `pj open`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Default sort field for `pj list`
    pub default_sort: SortBy,
}

/// Loaded configuration and where it came from
#[derive(Debug, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "pj").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::global_config_dir() {
            Some(dir) => Self::load_from(&dir.join("config.toml")),
            None => Ok(Self {
                global: GlobalConfig::default(),
                path: None,
            }),
        }
    }

    /// Loads configuration from `path`; a missing file gives defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let global = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;

            toml::from_str(&content)
                .map_err(|e| ConfigError::Parse(e.to_string()))
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        } else {
            GlobalConfig::default()
        };

        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Resolves the catalog file: explicit path, then config, then default
    pub fn catalog_path(&self, explicit: Option<&str>) -> Result<PathBuf> {
        match explicit.or(self.global.catalog.as_deref()) {
            Some(path) => expand_path(path)
                .with_context(|| format!("Invalid catalog path: {}", path)),
            None => Ok(default_catalog_path()),
        }
    }

    /// Saves the configuration back to where it was loaded from
    pub fn save(&self) -> Result<()> {
        let config_path = self
            .path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let content =
            toml::to_string_pretty(&self.global).context("Failed to serialize config")?;

        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))
    }
}
