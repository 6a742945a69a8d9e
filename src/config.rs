//! Dashboard configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::util;

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Monitoring API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Anti-forgery token for state-mutating requests (optional)
    #[serde(default)]
    pub csrf_token: Option<String>,

    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Log collection auto-revert window in milliseconds (default: 3000)
    #[serde(default = "default_revert_delay")]
    pub revert_delay_ms: u64,

    /// Enable debug logging (default: false)
    #[serde(default)]
    pub debug: bool,
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_revert_delay() -> u64 {
    3000
}

impl Config {
    /// Load configuration from file, or use defaults if no file exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(|p| p.to_path_buf()).or_else(|| {
            let default_path = dirs::config_dir()?.join("hostwatch/console.toml");
            default_path.exists().then_some(default_path)
        });

        let Some(path) = config_path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
            .inspect(|config| trace!("loaded config: {config:?}"))
    }

    /// Apply `HOSTWATCH_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        Self {
            api_url: util::get_api_url().unwrap_or(self.api_url),
            csrf_token: util::get_csrf_token().or(self.csrf_token),
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            csrf_token: None,
            request_timeout_secs: default_request_timeout(),
            revert_delay_ms: default_revert_delay(),
            debug: false,
        }
    }
}
