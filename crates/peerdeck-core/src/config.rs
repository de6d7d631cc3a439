//! Configuration management for Peerdeck.
//!
//! This module handles loading, saving, and managing Peerdeck configuration.
//!
//! ## Configuration File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/peerdeck/config.toml` |
//! | macOS | `~/Library/Application Support/Peerdeck/config.toml` |
//! | Windows | `%APPDATA%\Peerdeck\config.toml` |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration struct for Peerdeck.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API settings
    pub api: ApiConfig,
    /// Transfer history settings
    pub ledger: LedgerConfig,
}

/// Backend API configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend service
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: crate::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Transfer history configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Enable transfer history recording
    pub enabled: bool,
    /// Maximum history entries kept on disk
    pub max_entries: usize,
    /// History file location, overriding the platform data directory
    pub path: Option<PathBuf>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: crate::DEFAULT_HISTORY_ENTRIES,
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns the default configuration if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to the default location.
    ///
    /// Creates the configuration directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {e}"))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {e}")))
    }

    /// Get the default configuration directory path.
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "peerdeck", "Peerdeck")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the full path to the configuration file.
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }
}
