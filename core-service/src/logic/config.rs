//! Configuration - environment-driven settings for both shells
//!
//! Values come from the process environment (a `.env` file is loaded by the
//! binaries). Parsing goes through a lookup function so tests never touch
//! the real environment.

use std::path::PathBuf;

use crate::constants::*;
use super::features::{DeviceKind, UnknownDevicePolicy};
use super::simulator::SimulationMode;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Settings shared by every process that serves predictions
#[derive(Debug, Clone, PartialEq)]
pub struct ServingConfig {
    pub artifact_path: PathBuf,
    pub unknown_device_policy: UnknownDevicePolicy,
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            unknown_device_policy: UnknownDevicePolicy::default(),
        }
    }
}

impl ServingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let artifact_path = lookup(ENV_ARTIFACT_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_PATH));

        let unknown_device_policy = match lookup(ENV_UNKNOWN_DEVICE) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError {
                var: ENV_UNKNOWN_DEVICE,
                value: raw.clone(),
                reason,
            })?,
            None => UnknownDevicePolicy::default(),
        };

        Ok(Self { artifact_path, unknown_device_policy })
    }
}

/// Live dashboard settings
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub serving: ServingConfig,
    pub device: DeviceKind,
    pub interval_secs: u64,
    pub history_len: usize,
    pub mode: SimulationMode,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let serving = ServingConfig::from_lookup(&lookup)?;

        let device = match lookup(ENV_DASHBOARD_DEVICE) {
            Some(raw) => DeviceKind::lookup(&raw).ok_or_else(|| ConfigError {
                var: ENV_DASHBOARD_DEVICE,
                value: raw.clone(),
                reason: format!("expected one of {}", DeviceKind::names().join(", ")),
            })?,
            None => DeviceKind::default(),
        };

        let interval_secs = parse_number(&lookup, ENV_DASHBOARD_INTERVAL, DEFAULT_INTERVAL_SECS)?
            .clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS);

        let history_len = parse_number(&lookup, ENV_DASHBOARD_HISTORY, DEFAULT_HISTORY_LEN)?
            .clamp(MIN_HISTORY_LEN, MAX_HISTORY_LEN);

        let mode = match lookup(ENV_DASHBOARD_MODE) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError {
                var: ENV_DASHBOARD_MODE,
                value: raw.clone(),
                reason,
            })?,
            None => SimulationMode::default(),
        };

        Ok(Self { serving, device, interval_secs, history_len, mode })
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
            var,
            value: raw.clone(),
            reason: "not a number".to_string(),
        }),
        None => Ok(default),
    }
}
