//! Environment configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HarnessError, HarnessResult};

/// Env var naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "BACKOFFICE_HARNESS_CONFIG";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Target environment for a test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Base URL of the backoffice API
    pub api_base_url: String,

    /// Request timeout in milliseconds
    pub api_timeout_ms: u64,

    /// Admin account used by `login_admin`
    pub admin_username: String,

    pub admin_password: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_timeout_ms: DEFAULT_TIMEOUT_MS,
            admin_username: "admin".to_string(),
            admin_password: String::new(),
        }
    }
}

impl EnvConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> HarnessResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve configuration from the process environment
    ///
    /// Starts from the file named by `BACKOFFICE_HARNESS_CONFIG` (or the
    /// defaults) and applies `API_BASE_URL`, `API_TIMEOUT`, `ADMIN_USERNAME`
    /// and `ADMIN_PASSWORD` on top.
    pub fn from_env() -> HarnessResult<Self> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (env vars in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(timeout) = lookup("API_TIMEOUT") {
            self.api_timeout_ms = timeout.trim().parse().map_err(|_| {
                HarnessError::Config(format!("API_TIMEOUT is not a number: {:?}", timeout))
            })?;
        }
        if let Some(user) = lookup("ADMIN_USERNAME") {
            self.admin_username = user;
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.admin_password = password;
        }
        Ok(self)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> HarnessResult<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(HarnessError::Config("api_base_url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(HarnessError::Config(format!(
                "api_base_url must be http(s): {}",
                url
            )));
        }
        if self.api_timeout_ms == 0 {
            return Err(HarnessError::Config("api_timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }
}
