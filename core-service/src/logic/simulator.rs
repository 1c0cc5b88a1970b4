//! Telemetry Simulator - synthetic readings for the live dashboard
//!
//! `Uniform` draws every reading independently over the ranges seen in the
//! training data. `RandomWalk` drifts from the previous reading, which gives
//! smoother charts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::features::{Device, DeviceKind, TelemetrySample};

/// Uniform ranges (half-open)
pub const USAGE_HOURS_RANGE: (f64, f64) = (100.0, 9000.0);
pub const TEMPERATURE_RANGE: (f64, f64) = (25.0, 90.0);
pub const ERROR_COUNT_MAX: u32 = 8;

/// Random-walk starting point
const WALK_START: (f64, f64, u32) = (1200.0, 45.0, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    #[default]
    Uniform,
    RandomWalk,
}

impl std::str::FromStr for SimulationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "uniform" => Ok(SimulationMode::Uniform),
            "random_walk" | "walk" => Ok(SimulationMode::RandomWalk),
            other => Err(format!("unknown simulation mode '{}', expected uniform|random_walk", other)),
        }
    }
}

/// One simulated reading (device chosen by the caller)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub usage_hours: f64,
    pub temperature: f64,
    pub error_count: u32,
}

pub struct TelemetrySimulator {
    mode: SimulationMode,
    rng: StdRng,
    last: Reading,
}

impl TelemetrySimulator {
    pub fn new(mode: SimulationMode) -> Self {
        Self::with_rng(mode, StdRng::from_entropy())
    }

    /// Deterministic simulator for tests and replays
    pub fn with_seed(mode: SimulationMode, seed: u64) -> Self {
        Self::with_rng(mode, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mode: SimulationMode, rng: StdRng) -> Self {
        let (usage_hours, temperature, error_count) = WALK_START;
        Self {
            mode,
            rng,
            last: Reading { usage_hours, temperature, error_count },
        }
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn next_reading(&mut self) -> Reading {
        let reading = match self.mode {
            SimulationMode::Uniform => Reading {
                usage_hours: self.rng.gen_range(USAGE_HOURS_RANGE.0..USAGE_HOURS_RANGE.1),
                temperature: self.rng.gen_range(TEMPERATURE_RANGE.0..TEMPERATURE_RANGE.1),
                error_count: self.rng.gen_range(0..ERROR_COUNT_MAX),
            },
            SimulationMode::RandomWalk => {
                let usage_hours = (self.last.usage_hours + self.rng.gen_range(-100.0..100.0)).max(0.0);
                let temperature = (self.last.temperature + self.rng.gen_range(-2.0..2.0)).max(0.0);
                let errors = self.last.error_count as f64 + self.rng.gen_range(-1.0..2.0);
                Reading {
                    usage_hours,
                    temperature,
                    error_count: errors.round().max(0.0) as u32,
                }
            }
        };
        self.last = reading;
        reading
    }

    pub fn next_sample(&mut self, device: DeviceKind) -> TelemetrySample {
        let reading = self.next_reading();
        TelemetrySample {
            device: Device::Known(device),
            usage_hours: reading.usage_hours,
            temperature: reading.temperature,
            error_count: reading.error_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_ranges() {
        let mut sim = TelemetrySimulator::with_seed(SimulationMode::Uniform, 42);
        for _ in 0..500 {
            let r = sim.next_reading();
            assert!((100.0..9000.0).contains(&r.usage_hours));
            assert!((25.0..90.0).contains(&r.temperature));
            assert!(r.error_count < 8);
        }
    }

    #[test]
    fn test_random_walk_steps_are_small() {
        let mut sim = TelemetrySimulator::with_seed(SimulationMode::RandomWalk, 7);
        let mut prev = sim.next_reading();
        assert!((prev.usage_hours - 1200.0).abs() <= 100.0);

        for _ in 0..500 {
            let r = sim.next_reading();
            assert!((r.usage_hours - prev.usage_hours).abs() <= 100.0);
            assert!((r.temperature - prev.temperature).abs() <= 2.0);
            assert!(r.usage_hours >= 0.0 && r.temperature >= 0.0);
            assert!(r.error_count <= prev.error_count + 2);
            prev = r;
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = TelemetrySimulator::with_seed(SimulationMode::Uniform, 99);
        let mut b = TelemetrySimulator::with_seed(SimulationMode::Uniform, 99);
        for _ in 0..10 {
            assert_eq!(a.next_reading(), b.next_reading());
        }
    }

    #[test]
    fn test_sample_carries_device() {
        let mut sim = TelemetrySimulator::with_seed(SimulationMode::Uniform, 1);
        let sample = sim.next_sample(DeviceKind::Ventilator);
        assert_eq!(sample.device, Device::Known(DeviceKind::Ventilator));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("random-walk".parse::<SimulationMode>(), Ok(SimulationMode::RandomWalk));
        assert_eq!("UNIFORM".parse::<SimulationMode>(), Ok(SimulationMode::Uniform));
        assert!("sine".parse::<SimulationMode>().is_err());
    }
}
