//! Features Module - Feature Encoding
//!
//! Device enumeration, versioned layout, telemetry -> vector encoding.

pub mod device;
pub mod encoder;
pub mod layout;
pub mod vector;


// Re-export common types
pub use device::{Device, DeviceKind, DEVICE_COUNT};
pub use encoder::{EncodeError, FeatureEncoder, UnknownDevicePolicy};
pub use layout::{layout_hash, EncodingScheme, LayoutInfo, LayoutMismatchError, FEATURE_VERSION};
pub use vector::{FeatureVector, TelemetrySample};
