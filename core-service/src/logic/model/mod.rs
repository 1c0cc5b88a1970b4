//! Model Module - Inference backends & result classification
//!
//! Backends are swappable behind `RulModel`; the risk tiers and history
//! buffer do not care which one produced the number.

pub mod buffer;
pub mod forest;
pub mod inference;
pub mod threshold;

// Re-export common types
pub use buffer::{HistoryBuffer, HistoryFill};
pub use forest::{ForestModel, Tree, TreeNode};
pub use inference::{InferenceError, OnnxModel, RulModel};
pub use threshold::{classify_days, classify_years, RiskLabel, RiskTier};
