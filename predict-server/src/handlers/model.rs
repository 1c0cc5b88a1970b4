//! Model handlers - device list, status, reload

use axum::{extract::State, Json};
use serde::Serialize;

use rul_core::logic::artifact::ArtifactInfo;
use rul_core::logic::pipeline::PipelineStatus;
use rul_core::DeviceKind;

use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct DevicesResponse {
    pub devices: Vec<&'static str>,
    pub model_name: String,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub reloaded: bool,
    pub artifact: ArtifactInfo,
}

/// Device enumeration in code order
pub async fn devices(State(state): State<AppState>) -> Json<DevicesResponse> {
    Json(DevicesResponse {
        devices: DeviceKind::names(),
        model_name: state.pipeline.current().artifact().name.clone(),
    })
}

/// Loaded artifact, layout and inference stats
pub async fn status(State(state): State<AppState>) -> Json<PipelineStatus> {
    Json(state.pipeline.current().status())
}

/// Re-read the artifact; the old model keeps serving if this fails
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let handle = state.pipeline.clone();
    let artifact = tokio::task::spawn_blocking(move || handle.reload()).await??;

    tracing::info!("Artifact reloaded: {} ({})", artifact.name, artifact.backend);

    Ok(Json(ReloadResponse {
        reloaded: true,
        artifact,
    }))
}
