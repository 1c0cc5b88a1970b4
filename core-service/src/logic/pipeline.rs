//! Prediction Pipeline - encode -> predict -> classify
//!
//! The pipeline owns one immutable artifact for its lifetime. Calls are
//! independent and idempotent; the only mutable state is a pair of metric
//! counters. `PipelineHandle` swaps whole pipelines for hot reloads.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::artifact::{Artifact, ArtifactError, ArtifactInfo};
use super::features::{
    Device, EncodeError, FeatureEncoder, FeatureVector, LayoutInfo, LayoutMismatchError,
    TelemetrySample, UnknownDevicePolicy,
};
use super::model::threshold::{days_to_years, round_to};
use super::model::{classify_years, InferenceError, RiskLabel, RiskTier};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Structured prediction for one telemetry sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Remaining useful life in years, rounded to 3 decimals
    pub rul_years: f64,
    pub label: RiskLabel,
    pub tier: RiskTier,
    pub status: String,
    pub color: String,
    /// Model output in training units (days)
    pub raw_prediction: f64,
    pub device_code: u8,
    /// False when the device string fell back to code 0
    pub device_recognized: bool,
}

impl PredictionResult {
    /// Build from a raw day-count. Tiering uses the unrounded value.
    pub fn from_raw_days(raw_prediction: f64, device_code: u8, device_recognized: bool) -> Self {
        let years = days_to_years(raw_prediction);
        let tier = classify_years(years);

        Self {
            rul_years: round_to(years, 3),
            label: tier.label(),
            tier,
            status: tier.status().to_string(),
            color: tier.color().to_string(),
            raw_prediction,
            device_code,
            device_recognized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Status for UI / HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub artifact: ArtifactInfo,
    pub layout: LayoutInfo,
    pub unknown_device_policy: UnknownDevicePolicy,
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct Pipeline {
    artifact: Artifact,
    encoder: FeatureEncoder,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl Pipeline {
    pub fn new(artifact: Artifact, unknown_policy: UnknownDevicePolicy) -> Self {
        let encoder = FeatureEncoder::new(artifact.scheme(), unknown_policy);
        Self {
            artifact,
            encoder,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Load the artifact at `path`; any failure means there is nothing to serve
    pub fn load(path: impl AsRef<Path>, unknown_policy: UnknownDevicePolicy) -> Result<Self, ArtifactError> {
        Ok(Self::new(Artifact::load(path)?, unknown_policy))
    }

    pub fn artifact(&self) -> &ArtifactInfo {
        self.artifact.info()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Inference call used by the shells
    pub fn predict(
        &self,
        device: &str,
        usage_hours: f64,
        temperature: f64,
        error_count: u32,
    ) -> Result<PredictionResult, PipelineError> {
        self.predict_sample(&TelemetrySample::new(device, usage_hours, temperature, error_count))
    }

    pub fn predict_sample(&self, sample: &TelemetrySample) -> Result<PredictionResult, PipelineError> {
        let vector = self.encode(sample)?;
        let raw = self.predict_vector(&vector)?;

        let (device_code, recognized) = match &sample.device {
            Device::Known(kind) => (kind.code(), true),
            Device::Unknown(_) => (0, false),
        };

        let result = PredictionResult::from_raw_days(raw, device_code, recognized);
        log::debug!(
            "{} -> raw={:.1} days, rul={} years, label={}",
            sample.device, raw, result.rul_years, result.label
        );
        Ok(result)
    }

    pub fn encode(&self, sample: &TelemetrySample) -> Result<FeatureVector, PipelineError> {
        Ok(self.encoder.encode(sample)?)
    }

    /// Run the model on an already encoded vector
    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<f64, PipelineError> {
        vector.validate()?;
        if vector.scheme != self.artifact.scheme() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.artifact.scheme().width(),
                actual: vector.len(),
            }
            .into());
        }
        self.predict_raw(vector.as_slice())
    }

    /// Run the model on raw columns; width is checked by the backend
    pub fn predict_raw(&self, features: &[f32]) -> Result<f64, PipelineError> {
        let start = Instant::now();
        let result = self.artifact.model().predict(features);

        self.latency_sum_us.fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(result?)
    }

    pub fn status(&self) -> PipelineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        PipelineStatus {
            artifact: self.artifact.info().clone(),
            layout: LayoutInfo::for_scheme(self.artifact.scheme()),
            unknown_device_policy: self.encoder.unknown_policy(),
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}

// ============================================================================
// HANDLE (hot reload)
// ============================================================================

/// Shared holder of the current pipeline.
///
/// Readers clone the inner `Arc` and keep using it even if a reload swaps in
/// a new pipeline mid-request. A failed reload leaves the current one in place.
#[derive(Clone)]
pub struct PipelineHandle {
    current: Arc<RwLock<Arc<Pipeline>>>,
    source: Option<PathBuf>,
    unknown_policy: UnknownDevicePolicy,
}

impl PipelineHandle {
    pub fn new(pipeline: Pipeline) -> Self {
        let unknown_policy = pipeline.encoder.unknown_policy();
        Self {
            current: Arc::new(RwLock::new(Arc::new(pipeline))),
            source: None,
            unknown_policy,
        }
    }

    pub fn load(path: impl Into<PathBuf>, unknown_policy: UnknownDevicePolicy) -> Result<Self, ArtifactError> {
        let path = path.into();
        let pipeline = Pipeline::load(&path, unknown_policy)?;
        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(pipeline))),
            source: Some(path),
            unknown_policy,
        })
    }

    pub fn current(&self) -> Arc<Pipeline> {
        self.current.read().clone()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Replace the current pipeline
    pub fn swap(&self, pipeline: Pipeline) -> Arc<Pipeline> {
        std::mem::replace(&mut *self.current.write(), Arc::new(pipeline))
    }

    /// Re-read the artifact from its source path and swap it in
    pub fn reload(&self) -> Result<ArtifactInfo, ArtifactError> {
        let path = self.source().ok_or(ArtifactError::NoSource)?;

        let pipeline = Pipeline::load(path, self.unknown_policy).map_err(|e| {
            log::error!("Reload of {} failed, keeping current model: {}", path.display(), e);
            e
        })?;

        let info = pipeline.artifact().clone();
        self.swap(pipeline);
        log::info!("Model reloaded from {}: {} ({})", path.display(), info.name, info.backend);
        Ok(info)
    }
}
