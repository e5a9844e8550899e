//! # sweeper-rl
//!
//! A patch-based neural minesweeper agent trained by self-play.
//!
//! The agent never sees the whole board at once. Every turn it slices the
//! visible grid into overlapping 3×3 windows ("patches"), scores each window
//! with a small two-layer classifier, and folds the per-position mine
//! probabilities back onto the board as a per-cell risk map. Training is
//! self-play: the trainer reveals random cells, labels each window from the
//! ground-truth mine layout, and applies one plain gradient-descent step per
//! turn.
//!
//! ## Design Principles
//!
//! 1. **Simulator behind a trait**: The learning pipeline only talks to
//!    [`BoardSim`]. Tests and alternative board implementations plug in at
//!    that seam.
//!
//! 2. **Deterministic by construction**: Every random choice flows through an
//!    injected [`GameRng`]; evaluation games run on a fork so measuring the
//!    agent never shifts the training trajectory. A fixed seed reproduces a
//!    run bit for bit.
//!
//! 3. **Fixed architecture**: One hidden ReLU layer, softmax cross-entropy,
//!    plain SGD. This is not a neural-network library; shapes are pinned by
//!    the patch size.
//!
//! ## Modules
//!
//! - `core`: Seedable RNG and run configuration
//! - `board`: The `BoardSim` trait, the `MineBoard` reference simulator, and
//!   the read-only `BoardGrid` snapshot
//! - `patch`: Sliding-window feature extraction, labels, and the inverse
//!   patch/position → cell mapping
//! - `nn`: The two-layer classifier (forward, loss + gradients, predict)
//! - `policy`: Risk-map aggregation and move selection
//! - `training`: Self-play trainer and the accuracy evaluator

pub mod board;
pub mod core;
pub mod nn;
pub mod patch;
pub mod policy;
pub mod training;

// Re-export commonly used types
pub use crate::core::{GameRng, TrainerConfig};

pub use crate::board::{BoardGrid, BoardSim, GameStatus, MineBoard, HIDDEN, MINE};

pub use crate::patch::{labeled_batch, PatchExtractor};

pub use crate::nn::{Gradients, PatchClassifier};

pub use crate::policy::{predict_risk_map, RiskMap};

pub use crate::training::{Evaluator, TrainReport, Trainer};
