//! Configuration loading, validation, and management for AgentHub.
//!
//! Loads configuration from `~/.agenthub/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `~/.agenthub/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gateway (HTTP server) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Persisted store configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the channels JSON document.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    AppConfig::config_dir().join("channels.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from the default path (`~/.agenthub/config.toml`).
    ///
    /// Environment variable overrides (highest priority):
    /// - `AGENTHUB_HOST` — gateway bind address
    /// - `AGENTHUB_PORT` — gateway port
    /// - `AGENTHUB_DATA` — path to the channels JSON file
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(host) = std::env::var("AGENTHUB_HOST") {
            config.gateway.host = host;
        }
        if let Ok(port) = std::env::var("AGENTHUB_PORT") {
            config.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("AGENTHUB_PORT is not a port: {port}"))
            })?;
        }
        if let Ok(data) = std::env::var("AGENTHUB_DATA") {
            config.storage.path = PathBuf::from(data);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".agenthub")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.host.is_empty() {
            return Err(ConfigError::ValidationError(
                "gateway.host must not be empty".into(),
            ));
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.path must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// A commented default config file, written by `agenthub onboard`.
    pub fn default_toml() -> String {
        let defaults = Self::default();
        format!(
            r#"# AgentHub configuration

[gateway]
# Bind address for the HTTP server. Use 0.0.0.0 to accept remote agents.
host = "{host}"
port = {port}

[storage]
# Where channel logs and read cursors are persisted (single JSON document).
path = "{path}"
"#,
            host = defaults.gateway.host,
            port = defaults.gateway.port,
            path = defaults.storage.path.display(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.port, 5000);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.storage.path, config.storage.path);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.gateway.port, 5000);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let parsed: AppConfig = toml::from_str("[gateway]\nport = 8080\n").unwrap();
        assert_eq!(parsed.gateway.port, 8080);
        assert_eq!(parsed.gateway.host, "127.0.0.1");
    }

    #[test]
    fn empty_host_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gateway]\nhost = \"\"\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("5000"));
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, 5000);
    }
}
