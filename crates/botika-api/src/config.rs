//! # API Client Configuration
//!
//! Where the REST backend lives and how to talk to it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BOTIKA_API_URL=https://pos.example.ph/api                          │
//! │     BOTIKA_API_TOKEN=...                                               │
//! │     BOTIKA_API_TIMEOUT_SECS=15                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/botika-pos/api.toml (Linux)                              │
//! │     ~/Library/Application Support/ph.botika.pos/api.toml (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000/api, 30s timeout, no token                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! base_url = "https://pos.example.ph/api"
//! timeout_secs = 15
//! token = "secret"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings for the REST client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token, if the backend requires one.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl ApiConfig {
    /// Loads defaults, then the platform config file, then the environment.
    pub fn load() -> ClientResult<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "No api.toml found, using defaults");
                ApiConfig::default()
            }
            None => ApiConfig::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        info!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "API config loaded");
        Ok(config)
    }

    /// Reads a TOML config file.
    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parses TOML config content.
    pub fn from_toml(content: &str) -> ClientResult<Self> {
        toml::from_str(content).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Platform config path of `api.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("ph", "botika", "pos")
            .map(|dirs| dirs.config_dir().join("api.toml"))
    }

    /// Applies `BOTIKA_API_*` overrides from a variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BOTIKA_API_URL") {
            self.base_url = url;
        }

        if let Some(token) = lookup("BOTIKA_API_TOKEN") {
            self.token = if token.trim().is_empty() {
                None
            } else {
                Some(token)
            };
        }

        if let Some(timeout) = lookup("BOTIKA_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid BOTIKA_API_TIMEOUT_SECS"),
            }
        }
    }

    /// Checks the config is usable.
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Joins the base URL and an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
