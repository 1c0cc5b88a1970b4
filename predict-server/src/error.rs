//! Error handling
//!
//! Every failure on the prediction path is reported as HTTP 500 with the
//! message in the body, so clients can show it next to the form.

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use rul_core::{ArtifactError, PipelineError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request errors
    #[error("{0}")]
    InvalidInput(String),

    // Pipeline errors (encoding, shape, model)
    #[error(transparent)]
    Prediction(#[from] PipelineError),

    // Artifact (reload) errors
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    // Generic errors
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::InvalidInput(msg) => tracing::warn!("Invalid request: {}", msg),
            AppError::Prediction(err) => tracing::warn!("Prediction failed: {}", err),
            AppError::Artifact(err) => tracing::error!("Artifact error: {}", err),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("inference task failed: {}", err))
    }
}
