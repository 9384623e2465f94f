//! Harness settings loaded from `test-harness.json`.
//!
//! The file has the shape
//!
//! ```json
//! { "system": { "username": "admin@tdei.us", "password": "...", "baseUrl": "https://..." } }
//! ```
//!
//! It is read once when a client or seed manager is built. No network I/O
//! happens here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Environment variable that overrides the settings file location.
pub const CONFIG_PATH_ENV: &str = "TDEI_HARNESS_CONFIG";

/// Settings file looked up in the working directory by default.
pub const DEFAULT_CONFIG_PATH: &str = "test-harness.json";

/// Admin account and API location used by every suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    /// Admin (system) account username.
    pub username: String,
    /// Admin (system) account password.
    pub password: String,
    /// Root URL of the TDEI gateway, e.g. `https://tdei-gateway-dev.example.org`.
    pub base_url: String,
}

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub system: SystemConfig,
}

impl HarnessConfig {
    /// Builds a configuration in code, bypassing the settings file.
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        HarnessConfig {
            system: SystemConfig {
                username: username.to_string(),
                password: password.to_string(),
                base_url: base_url.to_string(),
            },
        }
    }

    /// Reads and validates the settings file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|message| HarnessError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Loads the settings file named by `TDEI_HARNESS_CONFIG`, falling back to
    /// `test-harness.json` in the working directory.
    pub fn discover() -> Result<Self> {
        Self::load(Self::discover_path())
    }

    /// The path [`discover`](Self::discover) would read.
    pub fn discover_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    fn from_json(content: &str) -> std::result::Result<Self, String> {
        let config: HarnessConfig = serde_json::from_str(content).map_err(|e| e.to_string())?;
        if config.system.base_url.trim().is_empty() {
            return Err("system.baseUrl must not be empty".to_string());
        }
        Ok(config)
    }

    /// Base URL normalized to end with exactly one `/`, ready for joining
    /// relative `api/v1/...` paths.
    pub fn base_url(&self) -> String {
        normalize_base_url(&self.system.base_url)
    }

    pub fn username(&self) -> &str {
        &self.system.username
    }

    pub fn password(&self) -> &str {
        &self.system.password
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}
