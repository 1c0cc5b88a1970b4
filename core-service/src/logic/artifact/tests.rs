use std::fs;

use serde_json::json;
use tempfile::tempdir;

use super::*;
use crate::logic::features::layout_hash;

fn forest_manifest(scheme: EncodingScheme, n_features: usize) -> serde_json::Value {
    json!({
        "format_version": 1,
        "name": "test-forest",
        "encoder": { "scheme": scheme, "layout_hash": layout_hash(scheme) },
        "target": "rul_days",
        "model": {
            "kind": "forest",
            "n_features": n_features,
            "trees": [[
                { "feature": 3, "threshold": 2.5, "left": 1, "right": 2 },
                { "value": 2000.0 },
                { "value": 500.0 }
            ]]
        }
    })
}

fn write_manifest(dir: &Path, manifest: &serde_json::Value) -> PathBuf {
    let path = dir.join("rul_model.json");
    fs::write(&path, serde_json::to_string_pretty(manifest).unwrap()).unwrap();
    path
}

#[test]
fn test_load_forest_artifact() {
    let dir = tempdir().unwrap();
    let path = write_manifest(dir.path(), &forest_manifest(EncodingScheme::Ordinal, 4));

    let artifact = Artifact::load(&path).unwrap();
    assert_eq!(artifact.info().name, "test-forest");
    assert_eq!(artifact.info().backend, "forest");
    assert_eq!(artifact.scheme(), EncodingScheme::Ordinal);
    assert_eq!(artifact.model().predict(&[1.0, 1200.0, 45.0, 1.0]).unwrap(), 2000.0);
}

#[test]
fn test_missing_artifact_is_fatal() {
    let dir = tempdir().unwrap();
    let err = Artifact::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ArtifactError::NotFound(_)));
}

#[test]
fn test_garbage_manifest() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rul_model.json");
    fs::write(&path, "not json at all").unwrap();
    assert!(matches!(Artifact::load(&path), Err(ArtifactError::Parse { .. })));
}

#[test]
fn test_layout_hash_mismatch_refuses_load() {
    let dir = tempdir().unwrap();
    let mut manifest = forest_manifest(EncodingScheme::Ordinal, 4);
    manifest["encoder"]["layout_hash"] = json!(layout_hash(EncodingScheme::Ordinal).wrapping_add(7));
    let path = write_manifest(dir.path(), &manifest);

    assert!(matches!(Artifact::load(&path), Err(ArtifactError::Layout(_))));
}

#[test]
fn test_width_mismatch_refuses_load() {
    let dir = tempdir().unwrap();
    // One-hot model (11 columns) declared against the ordinal encoder
    let path = write_manifest(dir.path(), &forest_manifest(EncodingScheme::Ordinal, 11));

    match Artifact::load(&path) {
        Err(ArtifactError::WidthMismatch { encoder, model }) => {
            assert_eq!(encoder, 4);
            assert_eq!(model, 11);
        }
        other => panic!("expected width mismatch, got {:?}", other),
    }
}

#[test]
fn test_breakdown_classifier_is_not_servable() {
    let dir = tempdir().unwrap();
    let mut manifest = forest_manifest(EncodingScheme::OneHot, 11);
    manifest["target"] = json!("breakdown_flag");
    let path = write_manifest(dir.path(), &manifest);

    assert!(matches!(
        Artifact::load(&path),
        Err(ArtifactError::UnsupportedTarget(PredictionTarget::BreakdownFlag))
    ));
}

#[test]
fn test_unsupported_format_version() {
    let dir = tempdir().unwrap();
    let mut manifest = forest_manifest(EncodingScheme::Ordinal, 4);
    manifest["format_version"] = json!(2);
    let path = write_manifest(dir.path(), &manifest);

    assert!(matches!(
        Artifact::load(&path),
        Err(ArtifactError::UnsupportedFormat { found: 2, expected: 1 })
    ));
}

#[test]
fn test_onnx_checksum_mismatch() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rul_model.onnx"), b"not really onnx").unwrap();

    let manifest = json!({
        "format_version": 1,
        "encoder": { "scheme": "ordinal", "layout_hash": layout_hash(EncodingScheme::Ordinal) },
        "target": "rul_days",
        "model": { "kind": "onnx", "path": "rul_model.onnx", "sha256": "00ff", "n_features": 4 }
    });
    let path = write_manifest(dir.path(), &manifest);

    match Artifact::load(&path) {
        Err(ArtifactError::ChecksumMismatch { expected, actual, .. }) => {
            assert_eq!(expected, "00ff");
            assert_eq!(actual.len(), 64);
        }
        other => panic!("expected checksum mismatch, got {:?}", other),
    }
}

#[test]
fn test_onnx_file_missing() {
    let dir = tempdir().unwrap();
    let manifest = json!({
        "format_version": 1,
        "encoder": { "scheme": "ordinal", "layout_hash": layout_hash(EncodingScheme::Ordinal) },
        "target": "rul_days",
        "model": { "kind": "onnx", "path": "missing.onnx" }
    });
    let path = write_manifest(dir.path(), &manifest);

    assert!(matches!(
        Artifact::load(&path),
        Err(ArtifactError::Model(InferenceError::Load(_)))
    ));
}

#[test]
fn test_default_name_is_file_name() {
    let dir = tempdir().unwrap();
    let mut manifest = forest_manifest(EncodingScheme::Ordinal, 4);
    manifest.as_object_mut().unwrap().remove("name");
    let path = write_manifest(dir.path(), &manifest);

    assert_eq!(Artifact::load(&path).unwrap().info().name, "rul_model.json");
}

#[test]
fn test_file_sha256() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob");
    fs::write(&path, b"abc").unwrap();
    assert_eq!(
        file_sha256(&path).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_bundled_demo_artifact_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../models/rul_model.json");
    let artifact = Artifact::load(&path).unwrap();

    assert_eq!(artifact.scheme(), EncodingScheme::Ordinal);
    let days = artifact.model().predict(&[1.0, 1200.0, 45.0, 1.0]).unwrap();
    assert!((days - 6950.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_onnx_artifact_with_checksum() {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/usage_passthrough.onnx");
    let dir = tempdir().unwrap();
    fs::copy(&fixture, dir.path().join("rul_model.onnx")).unwrap();

    let manifest = json!({
        "format_version": 1,
        "encoder": { "scheme": "ordinal", "layout_hash": layout_hash(EncodingScheme::Ordinal) },
        "target": "rul_days",
        "model": {
            "kind": "onnx",
            "path": "rul_model.onnx",
            "sha256": "6bd4210f671e1942c68b9265f051d21ddfc98ea1efded1bfbcf4a5819c0ff3b9",
            "n_features": 4
        }
    });
    let path = write_manifest(dir.path(), &manifest);

    let artifact = Artifact::load(&path).unwrap();
    assert_eq!(artifact.info().backend, "onnx");
    assert_eq!(artifact.model().predict(&[1.0, 1200.0, 45.0, 1.0]).unwrap(), 1200.0);
}
