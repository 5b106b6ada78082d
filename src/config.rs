//! Configuration loaded from `printshop.toml`.
//!
//! Values missing from the file fall back to defaults. The environment
//! variables `PRINTSHOP_API_URL` and `PRINTSHOP_API_TOKEN` take precedence
//! over the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "printshop.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrintshopConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

/// Settings for the job-management API client.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the job-management API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request. Empty means no auth header.
    #[serde(default)]
    pub token: String,

    /// Retries for transient failures (network, 429, 5xx).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Longest single wait between retries, also applied to `retry-after`.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PrintshopConfig {
    /// Loads `path`, or `printshop.toml` in the current directory when no
    /// path is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(
            std::env::var("PRINTSHOP_API_URL").ok(),
            std::env::var("PRINTSHOP_API_TOKEN").ok(),
        );
        tracing::debug!(base_url = %config.api.base_url, "configuration loaded");
        Ok(config)
    }

    // Non-empty environment values win over the file.
    fn apply_overrides(&mut self, url: Option<String>, token: Option<String>) {
        if let Some(url) = url
            && !url.is_empty()
        {
            self.api.base_url = url;
        }
        if let Some(token) = token
            && !token.is_empty()
        {
            self.api.token = token;
        }
        self.api.base_url = self.api.base_url.trim_end_matches('/').to_string();
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }
}
