//! Configuration module

use std::env;

use rul_core::constants::{DEFAULT_HOST, DEFAULT_PORT, ENV_HOST, ENV_PORT};
use rul_core::logic::config::{ConfigError, ServingConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Artifact path & unknown-device policy
    pub serving: ServingConfig,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var(ENV_PORT) {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError {
                var: ENV_PORT,
                value: raw.clone(),
                reason: "not a valid port".to_string(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            host: env::var(ENV_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
            serving: ServingConfig::from_env()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        })
    }
}
