//! Central Configuration Constants
//!
//! Single source of truth for configuration defaults and the environment
//! variable names that override them.

/// Default artifact manifest path
pub const DEFAULT_ARTIFACT_PATH: &str = "models/rul_model.json";

/// Default HTTP bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5001;

/// Dashboard refresh interval (seconds) and its allowed range
pub const DEFAULT_INTERVAL_SECS: u64 = 2;
pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 10;

/// Dashboard history length and its allowed range
pub const DEFAULT_HISTORY_LEN: usize = 50;
pub const MIN_HISTORY_LEN: usize = 10;
pub const MAX_HISTORY_LEN: usize = 500;

/// Wire defaults for fields missing from a prediction request
pub const DEFAULT_USAGE_HOURS: f64 = 1000.0;
pub const DEFAULT_TEMPERATURE: f64 = 40.0;
pub const DEFAULT_ERROR_COUNT: u32 = 0;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "RUL Monitor";

// ============================================
// Environment variable names
// ============================================

pub const ENV_ARTIFACT_PATH: &str = "RUL_ARTIFACT_PATH";
pub const ENV_UNKNOWN_DEVICE: &str = "RUL_UNKNOWN_DEVICE";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_DASHBOARD_DEVICE: &str = "DASHBOARD_DEVICE";
pub const ENV_DASHBOARD_INTERVAL: &str = "DASHBOARD_INTERVAL_SECS";
pub const ENV_DASHBOARD_HISTORY: &str = "DASHBOARD_HISTORY_LEN";
pub const ENV_DASHBOARD_MODE: &str = "DASHBOARD_MODE";
