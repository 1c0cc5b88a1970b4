//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema the model was trained on**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//! 4. Reorder `DeviceKind::ALL` → the hash changes, retrain the model
//!
//! The artifact stores the layout hash it was fitted against. Loading an
//! artifact whose hash differs from `layout_hash(scheme)` is refused.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::device::{DeviceKind, DEVICE_COUNT};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

/// Numeric telemetry columns, passed through unchanged by both schemes
pub const NUMERIC_FEATURES: &[&str] = &[
    "usage_hours",  // hours in service
    "temperature",  // degrees C
    "error_count",  // logged device errors
];

/// Ordinal layout: device code first, then numeric columns
pub const ORDINAL_LAYOUT: &[&str] = &[
    "device_code",  // 0: position in DeviceKind::ALL
    "usage_hours",  // 1
    "temperature",  // 2
    "error_count",  // 3
];

/// Width of the ordinal vector
/// IMPORTANT: Must match ORDINAL_LAYOUT.len()!
pub const ORDINAL_WIDTH: usize = 4;

/// Width of the one-hot vector (numeric passthrough + one column per device)
pub const ONE_HOT_WIDTH: usize = NUMERIC_FEATURES.len() + DEVICE_COUNT;

// ============================================================================
// ENCODING SCHEME
// ============================================================================

/// How the device identifier becomes numeric columns.
///
/// An artifact declares exactly one scheme; training and serving must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EncodingScheme {
    /// `[device_code, usage_hours, temperature, error_count]`
    #[default]
    Ordinal,
    /// `[usage_hours, temperature, error_count, onehot(device)...]`
    OneHot,
}

impl EncodingScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            EncodingScheme::Ordinal => "ordinal",
            EncodingScheme::OneHot => "one_hot",
        }
    }

    /// Vector width produced by this scheme
    pub fn width(self) -> usize {
        match self {
            EncodingScheme::Ordinal => ORDINAL_WIDTH,
            EncodingScheme::OneHot => ONE_HOT_WIDTH,
        }
    }

    /// Column names in exact vector order
    pub fn feature_names(self) -> Vec<String> {
        match self {
            EncodingScheme::Ordinal => ORDINAL_LAYOUT.iter().map(|s| s.to_string()).collect(),
            EncodingScheme::OneHot => NUMERIC_FEATURES
                .iter()
                .map(|s| s.to_string())
                .chain(DeviceKind::ALL.iter().map(|d| format!("device_name={}", d.name())))
                .collect(),
        }
    }
}

impl std::fmt::Display for EncodingScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout for a scheme
///
/// Ordinal layouts also hash the device enumeration, since the code of each
/// device is part of the meaning of column 0.
pub fn compute_layout_hash(scheme: EncodingScheme) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);
    hasher.update(scheme.as_str().as_bytes());
    hasher.update(&[0]);

    for name in scheme.feature_names() {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    if scheme == EncodingScheme::Ordinal {
        for device in DeviceKind::ALL {
            hasher.update(&[device.code()]);
            hasher.update(device.name().as_bytes());
            hasher.update(&[0]);
        }
    }

    hasher.finalize()
}

pub fn layout_hash(scheme: EncodingScheme) -> u32 {
    compute_layout_hash(scheme)
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub scheme: EncodingScheme,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn for_scheme(scheme: EncodingScheme) -> Self {
        Self {
            version: FEATURE_VERSION,
            scheme,
            hash: layout_hash(scheme),
            feature_count: scheme.width(),
            feature_names: scheme.feature_names(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Feature layout mismatch for {scheme} encoding: expected v{expected_version} (hash: {expected_hash:08x}), artifact has hash {actual_hash:08x}")]
pub struct LayoutMismatchError {
    pub scheme: EncodingScheme,
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_hash: u32,
}

/// Validate that an artifact's recorded hash matches the compiled-in layout
pub fn validate_layout(scheme: EncodingScheme, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash(scheme);

    if incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            scheme,
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

/// Get feature index by name
pub fn feature_index(scheme: EncodingScheme, name: &str) -> Option<usize> {
    scheme.feature_names().iter().position(|n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(ORDINAL_LAYOUT.len(), ORDINAL_WIDTH);
        assert_eq!(EncodingScheme::Ordinal.feature_names().len(), ORDINAL_WIDTH);
        assert_eq!(EncodingScheme::OneHot.feature_names().len(), ONE_HOT_WIDTH);
        assert_eq!(ONE_HOT_WIDTH, 11);
    }

    #[test]
    fn test_layout_hash_consistency() {
        let hash1 = compute_layout_hash(EncodingScheme::Ordinal);
        let hash2 = compute_layout_hash(EncodingScheme::Ordinal);
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, 0);
    }

    #[test]
    fn test_schemes_hash_differently() {
        assert_ne!(
            layout_hash(EncodingScheme::Ordinal),
            layout_hash(EncodingScheme::OneHot)
        );
    }

    #[test]
    fn test_validate_layout() {
        let scheme = EncodingScheme::Ordinal;
        assert!(validate_layout(scheme, layout_hash(scheme)).is_ok());

        let err = validate_layout(scheme, layout_hash(scheme).wrapping_add(1)).unwrap_err();
        assert_eq!(err.expected_hash, layout_hash(scheme));
        assert!(err.to_string().contains("ordinal"));
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index(EncodingScheme::Ordinal, "device_code"), Some(0));
        assert_eq!(feature_index(EncodingScheme::Ordinal, "error_count"), Some(3));
        assert_eq!(feature_index(EncodingScheme::OneHot, "usage_hours"), Some(0));
        assert_eq!(
            feature_index(EncodingScheme::OneHot, "device_name=Ventilator"),
            Some(4)
        );
        assert_eq!(feature_index(EncodingScheme::Ordinal, "nonexistent"), None);
    }

    #[test]
    fn test_scheme_serde() {
        let scheme: EncodingScheme = serde_json::from_str("\"one_hot\"").unwrap();
        assert_eq!(scheme, EncodingScheme::OneHot);
        assert_eq!(serde_json::to_string(&EncodingScheme::Ordinal).unwrap(), "\"ordinal\"");
    }
}
