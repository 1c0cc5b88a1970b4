//! Feature Vector - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! A vector always carries the scheme and layout hash it was encoded with,
//! so a model can refuse input produced for another layout.

use serde::{Deserialize, Serialize};

use super::device::Device;
use super::layout::{layout_hash, validate_layout, EncodingScheme, LayoutMismatchError, FEATURE_VERSION};

// ============================================================================
// TELEMETRY SAMPLE
// ============================================================================

/// One telemetry reading for one device. Built per inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    pub device: Device,
    pub usage_hours: f64,
    pub temperature: f64,
    pub error_count: u32,
}

impl TelemetrySample {
    pub fn new(device: &str, usage_hours: f64, temperature: f64, error_count: u32) -> Self {
        Self {
            device: Device::parse(device),
            usage_hours,
            temperature,
            error_count,
        }
    }
}

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// Encoding scheme that produced `values`
    pub scheme: EncodingScheme,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in layout order
    pub values: Vec<f32>,
}

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(scheme: EncodingScheme, values: Vec<f32>) -> Self {
        Self {
            version: FEATURE_VERSION,
            scheme,
            layout_hash: layout_hash(scheme),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Get feature by layout column name
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        super::layout::feature_index(self.scheme, name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.scheme, self.layout_hash)
    }
}
