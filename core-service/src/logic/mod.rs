//! Logic Module - Prediction pipeline & shells' shared logic
//!
//! - `features/` - Device enumeration, layout, encoder
//! - `model/` - Inference backends, risk tiers, history buffer
//! - `artifact` / `pipeline` - load once, predict many
//! - `simulator` / `dashboard` - live polling monitor

pub mod artifact;
pub mod config;
pub mod dashboard;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod simulator;
