//! RUL Core - Prediction Serving Pipeline
//!
//! Encode device telemetry, run the trained model, classify remaining useful life.
//!
//! ## Layout
//! - `logic/features/` - Device enumeration, feature layout, encoder
//! - `logic/model/` - Model backends (ONNX, native forest), risk tiers, history buffer
//! - `logic/artifact` - Trained artifact manifest & loading
//! - `logic/pipeline` - encode -> predict -> classify

pub mod constants;
pub mod logic;

pub use logic::artifact::{Artifact, ArtifactError};
pub use logic::features::{Device, DeviceKind, TelemetrySample};
pub use logic::pipeline::{Pipeline, PipelineError, PipelineHandle, PredictionResult};
