//! Inference-time move selection.
//!
//! Folds per-window class probabilities back onto the board as a per-cell
//! risk map and picks the lowest-risk hidden cell to reveal next.

pub mod predictor;

pub use predictor::{predict_risk_map, RiskMap};
