//! Self-play training and evaluation.
//!
//! ## Overview
//!
//! - **Trainer**: Plays episodes against the simulator, labels windows
//!   from ground truth, applies one SGD step per informative turn, and
//!   explores with purely random reveals — the classifier never picks
//!   training moves.
//! - **Evaluator**: Measures the win rate of greedy classifier-driven play
//!   over independent games.
//! - **TrainReport**: Tallies and histories of a run.
//!
//! ## Usage
//!
//! ```
//! use sweeper_rl::board::MineBoard;
//! use sweeper_rl::core::TrainerConfig;
//! use sweeper_rl::training::Trainer;
//!
//! let config = TrainerConfig::default()
//!     .with_board(5, 5)
//!     .with_mines(2)
//!     .with_eval_cadence(0, 0, 0);
//! let mut trainer = Trainer::new(MineBoard::new(), config, 42);
//! let report = trainer.train(10);
//! assert_eq!(report.wins + report.losses, 10);
//! ```

pub mod evaluator;
pub mod trainer;

pub use evaluator::Evaluator;
pub use trainer::{TrainReport, Trainer};
