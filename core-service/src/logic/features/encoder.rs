//! Feature Encoder - telemetry sample -> model input
//!
//! The only transform between raw telemetry and the model. No scaling, no
//! clipping: numeric fields pass through as-is once they are validated.

use serde::{Deserialize, Serialize};

use super::device::{Device, DEVICE_COUNT};
use super::layout::{EncodingScheme, NUMERIC_FEATURES};
use super::vector::{FeatureVector, TelemetrySample};

/// What to do with a device string that is not in the enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDevicePolicy {
    /// Encode as device code 0 (all-zero one-hot) and log a warning
    #[default]
    Fallback,
    /// Refuse the sample
    Reject,
}

impl std::str::FromStr for UnknownDevicePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(UnknownDevicePolicy::Fallback),
            "reject" => Ok(UnknownDevicePolicy::Reject),
            other => Err(format!("unknown device policy '{}', expected fallback|reject", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("Unknown device '{0}'")]
    UnknownDevice(String),

    #[error("Invalid {field}: {value} (must be finite{constraint})")]
    InvalidValue {
        field: &'static str,
        value: f64,
        constraint: &'static str,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder {
    scheme: EncodingScheme,
    unknown_policy: UnknownDevicePolicy,
}

impl FeatureEncoder {
    pub fn new(scheme: EncodingScheme, unknown_policy: UnknownDevicePolicy) -> Self {
        Self { scheme, unknown_policy }
    }

    pub fn scheme(&self) -> EncodingScheme {
        self.scheme
    }

    pub fn unknown_policy(&self) -> UnknownDevicePolicy {
        self.unknown_policy
    }

    /// Output width
    pub fn width(&self) -> usize {
        self.scheme.width()
    }

    /// Device code for the sample, applying the unknown-device policy
    pub fn device_code(&self, device: &Device) -> Result<u8, EncodeError> {
        match device {
            Device::Known(kind) => Ok(kind.code()),
            Device::Unknown(raw) => match self.unknown_policy {
                UnknownDevicePolicy::Fallback => {
                    log::warn!("Unrecognized device '{}', encoding as code 0", raw);
                    Ok(0)
                }
                UnknownDevicePolicy::Reject => Err(EncodeError::UnknownDevice(raw.clone())),
            },
        }
    }

    pub fn encode(&self, sample: &TelemetrySample) -> Result<FeatureVector, EncodeError> {
        check_value("usage_hours", sample.usage_hours, true)?;
        check_value("temperature", sample.temperature, false)?;

        let numeric = [
            sample.usage_hours as f32,
            sample.temperature as f32,
            sample.error_count as f32,
        ];
        debug_assert_eq!(numeric.len(), NUMERIC_FEATURES.len());

        let values = match self.scheme {
            EncodingScheme::Ordinal => {
                let code = self.device_code(&sample.device)?;
                let mut values = Vec::with_capacity(self.width());
                values.push(code as f32);
                values.extend_from_slice(&numeric);
                values
            }
            EncodingScheme::OneHot => {
                // Unknown devices get no hot column, like an encoder fitted to ignore them
                let hot = match &sample.device {
                    Device::Known(kind) => Some(kind.code() as usize),
                    Device::Unknown(_) => {
                        self.device_code(&sample.device)?;
                        None
                    }
                };
                let mut values = Vec::with_capacity(self.width());
                values.extend_from_slice(&numeric);
                values.extend((0..DEVICE_COUNT).map(|i| if Some(i) == hot { 1.0 } else { 0.0 }));
                values
            }
        };

        Ok(FeatureVector::from_values(self.scheme, values))
    }
}

fn check_value(field: &'static str, value: f64, non_negative: bool) -> Result<(), EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::InvalidValue { field, value, constraint: "" });
    }
    if non_negative && value < 0.0 {
        return Err(EncodeError::InvalidValue { field, value, constraint: " and non-negative" });
    }
    Ok(())
}
