//! Configuration file support.

use crate::service::LocalNotesService;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Path to the note collection file
    pub data_file: Option<PathBuf>,

    /// Base URL of a remote notes API (future capability; unset selects
    /// local storage)
    pub api_base: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/reef/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reef")
            .join("config.toml")
    }

    /// Resolve the note collection file, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--data-file` argument
    /// 2. Config file `data_file` setting
    /// 3. `<data_dir>/reef/notes-v1.json`
    pub fn data_file(&self, cli_file: Option<&PathBuf>) -> PathBuf {
        cli_file
            .cloned()
            .or_else(|| self.data_file.clone())
            .unwrap_or_else(LocalNotesService::default_path)
    }

    /// Resolve the remote API base URL.
    ///
    /// Precedence order:
    /// 1. `REEF_API_BASE` environment variable
    /// 2. Config file `api_base` setting
    ///
    /// Blank values count as unset.
    pub fn api_base(&self) -> Option<String> {
        std::env::var("REEF_API_BASE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.api_base.clone())
            .filter(|s| !s.trim().is_empty())
    }
}
