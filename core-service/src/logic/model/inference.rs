//! Inference Engine - model backends behind one trait
//!
//! A backend takes exactly one encoded feature vector and returns one scalar
//! in training-label units (days of remaining life). Width mismatches are
//! errors, never padded or truncated.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Feature shape mismatch: model expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model produced a non-finite prediction: {0}")]
    InvalidOutput(f64),

    #[error("Failed to load model: {0}")]
    Load(String),

    #[error("Inference failed: {0}")]
    Runtime(String),
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// A fitted model over the encoded feature space.
///
/// Implementations are shared read-only across threads for the process lifetime.
pub trait RulModel: Send + Sync {
    /// Short backend name for status views ("onnx", "forest")
    fn backend(&self) -> &'static str;

    /// Number of input columns, if the backend knows it statically
    fn input_width(&self) -> Option<usize>;

    /// Predict on one feature vector (batch of one)
    fn predict(&self, features: &[f32]) -> Result<f64, InferenceError>;
}

/// Shared width check for backends
pub fn check_width(expected: Option<usize>, features: &[f32]) -> Result<(), InferenceError> {
    match expected {
        Some(expected) if expected != features.len() => Err(InferenceError::ShapeMismatch {
            expected,
            actual: features.len(),
        }),
        _ => Ok(()),
    }
}

pub(crate) fn finite(value: f64) -> Result<f64, InferenceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InferenceError::InvalidOutput(value))
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Tree ensemble exported to ONNX, input `float32[1, width]`
pub struct OnnxModel {
    session: Mutex<Session>,
    output_name: String,
    input_width: Option<usize>,
}

impl OnnxModel {
    /// Load ONNX model from file
    pub fn load(model_path: &Path, input_width: Option<usize>) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError::Load(format!("Model not found: {}", model_path.display())));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Load(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Load(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Load(format!("Failed to load model: {}", e)))?;

        Self::from_session(session, input_width)
    }

    fn from_session(session: Session, input_width: Option<usize>) -> Result<Self, InferenceError> {
        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Load("No output defined".to_string()))?;

        log::info!("ONNX model loaded successfully (output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            input_width,
        })
    }
}

impl RulModel for OnnxModel {
    fn backend(&self) -> &'static str {
        "onnx"
    }

    fn input_width(&self) -> Option<usize> {
        self.input_width
    }

    fn predict(&self, features: &[f32]) -> Result<f64, InferenceError> {
        check_width(self.input_width, features)?;

        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        // Session::run needs exclusive access
        let mut session = self.session.lock();

        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs.get(&self.output_name)
            .ok_or_else(|| InferenceError::Runtime("No output".to_string()))?;

        let output_tensor = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        let value = output_tensor.1.first().copied()
            .ok_or_else(|| InferenceError::Runtime("Empty output tensor".to_string()))?;

        finite(value as f64)
    }
}
