//! Risk Tiers - remaining useful life -> operator judgment
//!
//! Pure and total: every scalar classifies. Tier boundaries (years):
//! - `years >= 5`      → High / Healthy
//! - `2 <= years < 5`  → Medium / Moderate
//! - otherwise         → Low / Critical (includes negative and NaN)

use serde::{Deserialize, Serialize};

/// Days per year used for the RUL conversion
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Lower bound (inclusive) of the Healthy tier, in years
pub const HEALTHY_MIN_YEARS: f64 = 5.0;

/// Lower bound (inclusive) of the Moderate tier, in years
pub const MODERATE_MIN_YEARS: f64 = 2.0;

/// Operator-facing RUL label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    High,
    Medium,
    Low,
}

/// Maintenance tier (same decision as `RiskLabel`, dashboard naming)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Healthy,
    Moderate,
    Critical,
}

impl RiskTier {
    pub fn label(self) -> RiskLabel {
        match self {
            RiskTier::Healthy => RiskLabel::High,
            RiskTier::Moderate => RiskLabel::Medium,
            RiskTier::Critical => RiskLabel::Low,
        }
    }

    /// Status message shown next to the estimate
    pub fn status(self) -> &'static str {
        match self {
            RiskTier::Healthy => "Healthy — No action needed",
            RiskTier::Moderate => "Moderate — Schedule maintenance soon",
            RiskTier::Critical => "Critical — Immediate maintenance required!",
        }
    }

    /// Display color (hex)
    pub fn color(self) -> &'static str {
        match self {
            RiskTier::Healthy => "#198754",
            RiskTier::Moderate => "#fd7e14",
            RiskTier::Critical => "#dc3545",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLabel::High => "High",
            RiskLabel::Medium => "Medium",
            RiskLabel::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Convert a day-count prediction to years
pub fn days_to_years(days: f64) -> f64 {
    days / DAYS_PER_YEAR
}

/// Classify an RUL expressed in years
///
/// Both lower bounds are inclusive: exactly 5.0 years is Healthy, exactly 2.0
/// is Moderate. The legacy Flask `main.py` compared with strict `>` and put
/// those two exact values one tier lower.
pub fn classify_years(years: f64) -> RiskTier {
    if years >= HEALTHY_MIN_YEARS {
        RiskTier::Healthy
    } else if years >= MODERATE_MIN_YEARS {
        RiskTier::Moderate
    } else {
        RiskTier::Critical
    }
}

/// Classify a raw day-count prediction
pub fn classify_days(days: f64) -> RiskTier {
    classify_years(days_to_years(days))
}

/// Round for display
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
