//! Trained Artifact - manifest loading & validation
//!
//! An artifact is a JSON manifest pairing the fitted encoder description with
//! the fitted model (inline forest or an ONNX file next to the manifest).
//! Loading either yields a fully validated artifact or an error; there is no
//! partially initialized state.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::features::{layout::validate_layout, EncodingScheme, LayoutMismatchError};
use super::model::{ForestModel, InferenceError, OnnxModel, RulModel, Tree};

/// Manifest format understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

// ============================================================================
// MANIFEST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trained_at: Option<String>,
    pub encoder: EncoderSpec,
    pub target: PredictionTarget,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSpec {
    pub scheme: EncodingScheme,
    pub layout_hash: u32,
}

/// What the model was trained to predict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionTarget {
    /// Remaining useful life in days (regression)
    RulDays,
    /// Binary breakdown flag (classification); not servable as RUL
    BreakdownFlag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Onnx {
        /// Relative to the manifest's directory
        path: PathBuf,
        #[serde(default)]
        sha256: Option<String>,
        #[serde(default)]
        n_features: Option<usize>,
    },
    Forest {
        n_features: usize,
        trees: Vec<Tree>,
    },
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid artifact manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported artifact format version {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    #[error("Artifact target {0:?} cannot be served as remaining useful life")]
    UnsupportedTarget(PredictionTarget),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("Encoder produces {encoder} features but model expects {model}")]
    WidthMismatch { encoder: usize, model: usize },

    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Model(#[from] InferenceError),

    #[error("Pipeline has no artifact path to reload from")]
    NoSource,
}

// ============================================================================
// ARTIFACT
// ============================================================================

/// Descriptive metadata, safe to serialize for status views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub name: String,
    pub source: String,
    pub scheme: EncodingScheme,
    pub layout_hash: u32,
    pub backend: String,
    pub trained_at: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Loaded, validated encoder description + model
pub struct Artifact {
    info: ArtifactInfo,
    model: Box<dyn RulModel>,
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact").field("info", &self.info).finish_non_exhaustive()
    }
}

impl Artifact {
    /// Assemble an artifact from an in-memory model
    pub fn new(
        name: impl Into<String>,
        scheme: EncodingScheme,
        model: Box<dyn RulModel>,
    ) -> Result<Self, ArtifactError> {
        check_model_width(scheme, model.as_ref())?;

        let name = name.into();
        Ok(Self {
            info: ArtifactInfo {
                source: name.clone(),
                name,
                scheme,
                layout_hash: super::features::layout_hash(scheme),
                backend: model.backend().to_string(),
                trained_at: None,
                loaded_at: Utc::now(),
            },
            model,
        })
    }

    /// Load and validate a manifest from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        log::info!("Loading artifact from: {}", path.display());

        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest: ArtifactManifest = serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let artifact = Self::from_manifest(manifest, base_dir, &path.display().to_string())?;

        log::info!(
            "Artifact '{}' ready: backend={}, scheme={}, layout={:08x}",
            artifact.info.name,
            artifact.info.backend,
            artifact.info.scheme,
            artifact.info.layout_hash
        );

        Ok(artifact)
    }

    /// Validate a parsed manifest; relative model paths resolve against `base_dir`
    pub fn from_manifest(
        manifest: ArtifactManifest,
        base_dir: &Path,
        source: &str,
    ) -> Result<Self, ArtifactError> {
        if manifest.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedFormat {
                found: manifest.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        if manifest.target != PredictionTarget::RulDays {
            return Err(ArtifactError::UnsupportedTarget(manifest.target));
        }

        let scheme = manifest.encoder.scheme;
        validate_layout(scheme, manifest.encoder.layout_hash)?;

        let model: Box<dyn RulModel> = match manifest.model {
            ModelSpec::Forest { n_features, trees } => Box::new(ForestModel::new(n_features, trees)?),
            ModelSpec::Onnx { path, sha256, n_features } => {
                let model_path = base_dir.join(path);
                if let Some(expected) = sha256 {
                    verify_checksum(&model_path, &expected)?;
                }
                Box::new(OnnxModel::load(&model_path, n_features)?)
            }
        };

        check_model_width(scheme, model.as_ref())?;

        let name = manifest.name.unwrap_or_else(|| {
            Path::new(source)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.to_string())
        });

        Ok(Self {
            info: ArtifactInfo {
                name,
                source: source.to_string(),
                scheme,
                layout_hash: manifest.encoder.layout_hash,
                backend: model.backend().to_string(),
                trained_at: manifest.trained_at,
                loaded_at: Utc::now(),
            },
            model,
        })
    }

    pub fn info(&self) -> &ArtifactInfo {
        &self.info
    }

    pub fn scheme(&self) -> EncodingScheme {
        self.info.scheme
    }

    pub fn model(&self) -> &dyn RulModel {
        self.model.as_ref()
    }
}

fn check_model_width(scheme: EncodingScheme, model: &dyn RulModel) -> Result<(), ArtifactError> {
    match model.input_width() {
        Some(width) if width != scheme.width() => Err(ArtifactError::WidthMismatch {
            encoder: scheme.width(),
            model: width,
        }),
        _ => Ok(()),
    }
}

/// Compute SHA-256 of a file as lowercase hex
pub fn file_sha256(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

fn verify_checksum(path: &Path, expected: &str) -> Result<(), ArtifactError> {
    let actual = file_sha256(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ArtifactError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    log::debug!("Checksum verified for {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests;
