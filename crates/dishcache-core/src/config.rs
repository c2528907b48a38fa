//! Application configuration management.
//!
//! Configuration holds the backend base URL, the local store location and
//! the limits applied to the local history mirrors. It is loaded once and
//! passed explicitly to whatever needs it.
//!
//! Configuration is stored at `~/.config/dishcache/config.json`. The
//! `DISHCACHE_BASE_URL` environment variable overrides the base URL.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::DEFAULT_PAGE_SIZE;

/// Application name used for config/store directory paths
const APP_NAME: &str = "dishcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "DISHCACHE_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Cap on the local favorites mirror.
const DEFAULT_FAVORITES_LIMIT: usize = 200;
const DEFAULT_SEARCH_HISTORY_LIMIT: usize = 10;
const DEFAULT_VIEW_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// Local store directory; defaults to the platform cache dir.
    pub store_dir: Option<PathBuf>,
    /// No timeout is applied unless set.
    pub request_timeout_secs: Option<u64>,
    pub page_size: u32,
    pub favorites_limit: usize,
    pub search_history_limit: usize,
    pub view_history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            store_dir: None,
            request_timeout_secs: None,
            page_size: DEFAULT_PAGE_SIZE,
            favorites_limit: DEFAULT_FAVORITES_LIMIT,
            search_history_limit: DEFAULT_SEARCH_HISTORY_LIMIT,
            view_history_limit: DEFAULT_VIEW_HISTORY_LIMIT,
        }
    }
}

impl Config {
    /// Load from the config file (defaults when missing), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env();
        Ok(config)
    }

    /// The config file alone, without environment overrides.
    pub fn load_file() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to parse config file")
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Location of the config file.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.set_base_url(&url);
        }
    }

    /// Trimmed and without a trailing slash. Blank input is ignored.
    pub fn set_base_url(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.base_url = url.trim_end_matches('/').to_string();
        }
    }

    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
