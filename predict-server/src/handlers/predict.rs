//! Prediction handler

use axum::{body::Bytes, extract::State, Json};

use rul_core::logic::dashboard::clock_time;

use crate::models::{PredictRequest, PredictResponse};
use crate::{AppResult, AppState};

/// POST /predict
///
/// The body is parsed by hand so malformed JSON is reported the same way as
/// every other prediction failure.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<PredictResponse>> {
    let request = PredictRequest::from_json(&body)?;
    let pipeline = state.pipeline.current();

    let result = tokio::task::spawn_blocking(move || {
        pipeline.predict(
            &request.device,
            request.usage_hours,
            request.temperature,
            request.error_count,
        )
    })
    .await??;

    if !result.device_recognized {
        tracing::warn!("Unrecognized device in request, served as device code 0");
    }

    Ok(Json(PredictResponse {
        result,
        time: clock_time(),
    }))
}
