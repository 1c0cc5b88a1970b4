//! RUL Prediction Server
//!
//! HTTP front-end over the prediction pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  RUL PREDICTION SERVER                │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────────────────────────┐  │
//! │  │  API      │──▶│  PipelineHandle                │  │
//! │  │  (Axum)   │   │  encode -> model -> risk tier  │  │
//! │  └───────────┘   └───────────────┬────────────────┘  │
//! │                                  ▼                   │
//! │                        ┌──────────────────┐          │
//! │                        │ artifact (.json) │          │
//! │                        └──────────────────┘          │
//! └──────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;


use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rul_core::PipelineHandle;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "rul_server=debug,rul_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env().context("Invalid configuration")?;

    tracing::info!("RUL Prediction Server starting ({})...", config.environment);
    tracing::info!("Artifact: {}", config.serving.artifact_path.display());

    // Load the artifact before accepting any traffic
    let pipeline = PipelineHandle::load(
        config.serving.artifact_path.clone(),
        config.serving.unknown_device_policy,
    )
    .context("Failed to load model artifact")?;

    let info = pipeline.current().artifact().clone();
    tracing::info!(
        "Model '{}' loaded (backend: {}, encoding: {}, unknown devices: {:?})",
        info.name, info.backend, info.scheme, config.serving.unknown_device_policy
    );

    // Build application state
    let state = AppState {
        pipeline,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PipelineHandle,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/api/v1/devices", get(handlers::model::devices))
        .route("/api/v1/model", get(handlers::model::status))
        .route("/api/v1/model/reload", post(handlers::model::reload));

    Router::new()
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
