//! Service configuration loaded from a TOML file.

use std::path::Path;

use herald_dispatch::RetryPolicy;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level service configuration.
///
/// Only the gateway and origin URLs are required; everything else carries a
/// default.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    pub origin: OriginConfig,
}

impl Config {
    /// Load and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Ok(toml::from_str(&content)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API server binds, e.g. `[::]:8080` or `127.0.0.1:8080`.
    #[serde(default = "defaults::listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: defaults::listen(),
        }
    }
}

/// Transactional-email gateway endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub url: String,
    /// Connect and request timeout for gateway calls, in seconds.
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,
}

/// Batching and retry behaviour for outbound sends.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,
    #[serde(flatten)]
    pub policy: RetryPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            policy: RetryPolicy::default(),
        }
    }
}

/// Origin system receiving status reports.
#[derive(Debug, Clone, Deserialize)]
pub struct OriginConfig {
    pub url: String,
    /// Connect and request timeout for report calls, in seconds.
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(flatten)]
    pub policy: RetryPolicy,
}

mod defaults {
    pub(super) fn listen() -> String {
        "[::]:8080".to_string()
    }

    pub(super) const fn timeout_secs() -> u64 {
        10
    }

    pub(super) const fn batch_size() -> usize {
        20
    }
}
