//! Configuration loading from warden.toml.

use std::path::{Path, PathBuf};

use catalog::PermissionMode;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Policy oracle configuration.
    pub oracle: OracleConfig,

    /// Gateway configuration.
    pub gateway: GatewayConfig,
}

/// Policy oracle settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Whether remote policy evaluation is active.
    pub enabled: bool,

    /// Base URL of the policy service.
    pub url: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:8080".to_string(),
        }
    }
}

/// Gateway settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Global permission mode (auto, deny_all, manual_all).
    pub permission_mode: PermissionMode,

    /// Location of the execution audit database.
    pub audit_db: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            permission_mode: PermissionMode::Auto,
            audit_db: PathBuf::from("warden-audit.db"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
