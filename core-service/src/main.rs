//! RUL Dashboard - Live predictive maintenance monitor
//!
//! Loads the trained artifact once, then polls simulated telemetry for one
//! device on a fixed interval until Ctrl-C.

use rul_core::constants::{APP_NAME, APP_VERSION};
use rul_core::logic::config::DashboardConfig;
use rul_core::logic::dashboard::{render, Monitor};
use rul_core::PipelineHandle;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting {} dashboard v{}...", APP_NAME, APP_VERSION);

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    // No artifact, no dashboard
    let pipeline = match PipelineHandle::load(
        config.serving.artifact_path.clone(),
        config.serving.unknown_device_policy,
    ) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("Cannot load model artifact: {}", e);
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Ctrl-C received, stopping monitor");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // Keep the sender alive; the monitor runs until killed
                log::warn!("Ctrl-C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    let mut monitor = Monitor::new(pipeline, &config);
    let device = monitor.device();

    println!("{} - monitoring {}", APP_NAME, device);
    monitor
        .run(shutdown_rx, |tick, history| {
            println!("{}", render(device, tick, history));
        })
        .await;
}
