//! Live Dashboard - scheduled polling task over the pipeline
//!
//! Every tick simulates one reading for the selected device, predicts,
//! appends to a bounded history and hands the result to a renderer. The
//! loop ends when the shutdown signal flips to `true` (or its sender drops).

use std::time::Duration;

use owo_colors::OwoColorize;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::config::DashboardConfig;
use super::features::DeviceKind;
use super::model::threshold::{days_to_years, round_to};
use super::model::{HistoryBuffer, RiskTier};
use super::pipeline::{PipelineError, PipelineHandle, PredictionResult};
use super::simulator::TelemetrySimulator;

/// One row of dashboard history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub time: String,
    pub usage_hours: f64,
    pub temperature: f64,
    pub error_count: u32,
    pub rul_years: f64,
    pub status: String,
    pub tier: RiskTier,
}

/// Result of one successful tick
#[derive(Debug, Clone)]
pub struct Tick {
    pub entry: HistoryEntry,
    pub prediction: PredictionResult,
}

pub struct Monitor {
    pipeline: PipelineHandle,
    device: DeviceKind,
    simulator: TelemetrySimulator,
    history: HistoryBuffer<HistoryEntry>,
    interval: Duration,
}

impl Monitor {
    pub fn new(pipeline: PipelineHandle, config: &DashboardConfig) -> Self {
        Self::with_simulator(
            pipeline,
            config.device,
            TelemetrySimulator::new(config.mode),
            config.history_len,
            Duration::from_secs(config.interval_secs),
        )
    }

    pub fn with_simulator(
        pipeline: PipelineHandle,
        device: DeviceKind,
        simulator: TelemetrySimulator,
        history_len: usize,
        interval: Duration,
    ) -> Self {
        Self {
            pipeline,
            device,
            simulator,
            history: HistoryBuffer::new(history_len),
            interval,
        }
    }

    pub fn device(&self) -> DeviceKind {
        self.device
    }

    pub fn history(&self) -> &HistoryBuffer<HistoryEntry> {
        &self.history
    }

    /// Simulate one reading, predict and record it
    pub fn tick(&mut self) -> Result<Tick, PipelineError> {
        let sample = self.simulator.next_sample(self.device);
        let prediction = self.pipeline.current().predict_sample(&sample)?;

        let entry = HistoryEntry {
            time: clock_time(),
            usage_hours: round_to(sample.usage_hours, 2),
            temperature: round_to(sample.temperature, 2),
            error_count: sample.error_count,
            rul_years: round_to(days_to_years(prediction.raw_prediction), 2),
            status: prediction.status.clone(),
            tier: prediction.tier,
        };
        self.history.push(entry.clone());

        Ok(Tick { entry, prediction })
    }

    /// Run until shutdown. A failed tick is logged and the loop continues.
    pub async fn run<F>(&mut self, mut shutdown: watch::Receiver<bool>, mut on_tick: F) -> u64
    where
        F: FnMut(&Tick, &HistoryBuffer<HistoryEntry>),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;

        log::info!(
            "Monitoring {} every {:?} (history {}, mode {:?})",
            self.device, self.interval, self.history.capacity(), self.simulator.mode()
        );

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match self.tick() {
                        Ok(tick) => {
                            ticks += 1;
                            on_tick(&tick, &self.history);
                        }
                        Err(e) => log::error!("Prediction failed: {}", e),
                    }
                }
            }
        }

        log::info!("Monitor stopped after {} ticks", ticks);
        ticks
    }
}

/// Wall-clock time as HH:MM:SS
pub fn clock_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Terminal rendering of one tick
pub fn render(device: DeviceKind, tick: &Tick, history: &HistoryBuffer<HistoryEntry>) -> String {
    let status = match tick.prediction.tier {
        RiskTier::Healthy => tick.entry.status.green().to_string(),
        RiskTier::Moderate => tick.entry.status.yellow().to_string(),
        RiskTier::Critical => tick.entry.status.bright_red().to_string(),
    };

    let trend: String = history
        .iter()
        .map(|e| match e.tier {
            RiskTier::Healthy => '+',
            RiskTier::Moderate => '~',
            RiskTier::Critical => '!',
        })
        .collect();

    let fill = history.fill();

    format!(
        "[{}] {} | usage {:>8.2} h | temp {:>6.2} C | errors {} | RUL {:>6.2} years | {}\n           history {}/{} ({}%) [{}]",
        tick.entry.time,
        device.name().cyan(),
        tick.entry.usage_hours,
        tick.entry.temperature,
        tick.entry.error_count,
        tick.entry.rul_years,
        status,
        fill.entries,
        fill.capacity,
        fill.percent,
        trend
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::artifact::Artifact;
    use crate::logic::features::{EncodingScheme, UnknownDevicePolicy};
    use crate::logic::model::{ForestModel, TreeNode};
    use crate::logic::pipeline::Pipeline;
    use crate::logic::simulator::SimulationMode;

    fn handle(days: f64) -> PipelineHandle {
        let forest = ForestModel::new(4, vec![vec![TreeNode::Leaf { value: days }]]).unwrap();
        let artifact = Artifact::new("constant", EncodingScheme::Ordinal, Box::new(forest)).unwrap();
        PipelineHandle::new(Pipeline::new(artifact, UnknownDevicePolicy::Fallback))
    }

    fn monitor(days: f64, history_len: usize) -> Monitor {
        Monitor::with_simulator(
            handle(days),
            DeviceKind::Ventilator,
            TelemetrySimulator::with_seed(SimulationMode::Uniform, 3),
            history_len,
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_tick_records_history() {
        let mut monitor = monitor(1000.0, 10);
        let tick = monitor.tick().unwrap();

        assert_eq!(tick.prediction.tier, RiskTier::Moderate);
        assert_eq!(tick.entry.rul_years, 2.74);
        assert_eq!(monitor.history().len(), 1);
        assert_eq!(monitor.history().latest(), Some(&tick.entry));
        assert_eq!(tick.entry.time.len(), 8);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut monitor = monitor(3000.0, 10);
        for _ in 0..25 {
            monitor.tick().unwrap();
        }
        assert_eq!(monitor.history().len(), 10);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut monitor = monitor(500.0, 10);
        let (tx, rx) = watch::channel(false);

        let mut seen = Vec::new();
        let ticks = monitor
            .run(rx, |tick, _history| {
                seen.push(tick.prediction.tier);
                if seen.len() == 3 {
                    let _ = tx.send(true);
                }
            })
            .await;

        assert_eq!(ticks, 3);
        assert!(seen.iter().all(|t| *t == RiskTier::Critical));
        assert_eq!(monitor.history().len(), 3);
    }

    #[test]
    fn test_render_mentions_status() {
        let mut monitor = monitor(2500.0, 10);
        let tick = monitor.tick().unwrap();
        let line = render(DeviceKind::Ventilator, &tick, monitor.history());
        assert!(line.contains("Healthy"));
        assert!(line.contains("Ventilator"));
        assert!(line.contains("history 1/10 (10%)"));
    }
}
