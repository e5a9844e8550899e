//! Training run configuration.
//!
//! One struct carries every knob of a run: board shape, mine count, network
//! width, SGD hyperparameters, and the evaluation cadence. Defaults match
//! the reference setup (8×8 board, 3 mines, 3×3 patches, 100 hidden units).

use serde::{Deserialize, Serialize};

/// Configuration for a training run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Mines placed per board.
    pub mine_count: usize,

    /// Board width in cells. Must be at least `patch_size`.
    pub board_width: usize,

    /// Board height in cells. Must be at least `patch_size`.
    pub board_height: usize,

    /// Side length of the square sliding window.
    pub patch_size: usize,

    /// Hidden layer width of the classifier.
    pub hidden_dim: usize,

    /// SGD learning rate.
    pub learning_rate: f32,

    /// L2 penalty strength on both weight matrices.
    pub regularization: f32,

    /// Run an accuracy evaluation every this many episodes.
    /// 0 disables evaluation entirely.
    pub eval_interval: usize,

    /// Skip evaluation until this many episodes have been played.
    pub eval_warmup: usize,

    /// Full games played per evaluation pass.
    pub eval_games: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            mine_count: 3,
            board_width: 8,
            board_height: 8,
            patch_size: 3,
            hidden_dim: 100,
            learning_rate: 1e-3,
            regularization: 5e-6,
            eval_interval: 200,
            eval_warmup: 500,
            eval_games: 100,
        }
    }
}

impl TrainerConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board dimensions.
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Set the number of mines per board.
    pub fn with_mines(mut self, mines: usize) -> Self {
        self.mine_count = mines;
        self
    }

    /// Set the sliding-window side length.
    pub fn with_patch_size(mut self, size: usize) -> Self {
        self.patch_size = size;
        self
    }

    /// Set the hidden layer width.
    pub fn with_hidden_dim(mut self, dim: usize) -> Self {
        self.hidden_dim = dim;
        self
    }

    /// Set the SGD learning rate.
    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Set the L2 penalty strength.
    pub fn with_regularization(mut self, reg: f32) -> Self {
        self.regularization = reg;
        self
    }

    /// Set the evaluation cadence: run `games` evaluation games every
    /// `interval` episodes once `warmup` episodes have been played.
    pub fn with_eval_cadence(mut self, interval: usize, warmup: usize, games: usize) -> Self {
        self.eval_interval = interval;
        self.eval_warmup = warmup;
        self.eval_games = games;
        self
    }

    /// Flattened window length, the classifier's input and output width.
    #[must_use]
    pub fn patch_len(&self) -> usize {
        self.patch_size * self.patch_size
    }
}
