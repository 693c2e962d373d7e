//! File-based configuration for sessions and the runtime.

use std::path::Path;

use serde::Deserialize;

use crate::{runtime::handle::RuntimeConfig, session::SessionConfig};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Combined settings. Missing sections and fields fall back to defaults.
///
/// ```
/// use swipebite::config::AppConfig;
///
/// let cfg = AppConfig::from_json_str(r#"{ "runtime": { "fetch_latency_ms": 0 } }"#).unwrap();
/// assert_eq!(cfg.runtime.fetch_latency_ms, 0);
/// assert_eq!(cfg.runtime.auth_latency_ms, 800);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Session behaviour.
    pub session: SessionConfig,
    /// Command loop behaviour.
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
