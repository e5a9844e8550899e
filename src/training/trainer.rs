//! Self-play training loop.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{BoardGrid, BoardSim, GameStatus};
use crate::core::{GameRng, TrainerConfig};
use crate::nn::PatchClassifier;
use crate::patch::{labeled_batch, PatchExtractor};

use super::evaluator::Evaluator;

/// Attempts of raw coordinate rejection sampling per hidden-cell draw
/// before falling back to an explicit scan (same distribution, but
/// guaranteed to terminate).
const REJECTION_ATTEMPTS_PER_CELL: usize = 4;

/// Outcome tallies and histories of a training run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// Episodes played.
    pub episodes: usize,

    /// Episodes that ended with every safe cell revealed.
    pub wins: usize,

    /// Episodes that ended on a mine.
    pub losses: usize,

    /// Loss recorded at every learning step, across all episodes.
    pub loss_history: Vec<f32>,

    /// `(episode, win_rate)` per evaluation pass.
    pub eval_history: Vec<(usize, f64)>,
}

impl TrainReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of episodes won so far.
    #[must_use]
    pub fn win_ratio(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }

    /// Most recent evaluation win rate, if any evaluation has run.
    #[must_use]
    pub fn last_eval(&self) -> Option<f64> {
        self.eval_history.last().map(|&(_, rate)| rate)
    }
}

/// Drives self-play episodes and gradient updates.
///
/// Exploration during training is fully random: the classifier's own
/// predictions are only consulted by the [`Evaluator`]'s greedy games,
/// which run on a forked RNG so they never perturb the training stream.
pub struct Trainer<S: BoardSim> {
    sim: S,
    classifier: PatchClassifier,
    extractor: PatchExtractor,
    config: TrainerConfig,
    rng: GameRng,
}

impl<S: BoardSim> Trainer<S> {
    /// Create a trainer with freshly initialised parameters.
    pub fn new(sim: S, config: TrainerConfig, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let classifier = PatchClassifier::new(
            config.patch_len(),
            config.hidden_dim,
            config.patch_len(),
            &mut rng,
        );
        let extractor = PatchExtractor::new(config.patch_size);
        Self {
            sim,
            classifier,
            extractor,
            config,
            rng,
        }
    }

    /// The current classifier parameters.
    #[must_use]
    pub fn classifier(&self) -> &PatchClassifier {
        &self.classifier
    }

    /// Consume the trainer, keeping the trained classifier.
    #[must_use]
    pub fn into_classifier(self) -> PatchClassifier {
        self.classifier
    }

    /// Play `episodes` self-play games, learning from each turn that
    /// carries mine information, and evaluating periodically.
    pub fn train(&mut self, episodes: usize) -> TrainReport {
        let mut report = TrainReport::new();

        for episode in 0..episodes {
            self.play_training_episode(&mut report);
            report.episodes += 1;

            match self.sim.status() {
                GameStatus::Won => {
                    report.wins += 1;
                    info!(
                        episode,
                        wins = report.wins,
                        win_ratio = report.win_ratio(),
                        "episode won"
                    );
                }
                GameStatus::Lost => report.losses += 1,
                GameStatus::InProgress => {
                    // Only reachable when the board ran out of hidden cells
                    // without the simulator reporting a terminal state.
                    debug_assert!(false, "episode ended while still in progress");
                }
            }

            if self.should_evaluate(episode) {
                let mut eval_rng = self.rng.fork();
                let evaluator = Evaluator::from_config(&self.config);
                let rate = evaluator.win_rate(
                    &mut self.sim,
                    &self.classifier,
                    self.config.eval_games,
                    &mut eval_rng,
                );
                info!(episode, win_rate = rate, games = self.config.eval_games, "evaluation");
                report.eval_history.push((episode, rate));
            }
        }

        report
    }

    fn should_evaluate(&self, episode: usize) -> bool {
        self.config.eval_interval != 0
            && self.config.eval_games != 0
            && episode > self.config.eval_warmup
            && episode % self.config.eval_interval == 0
    }

    /// One episode: reset, reveal a random opening cell, then alternate
    /// learning steps with random reveals until the game ends.
    fn play_training_episode(&mut self, report: &mut TrainReport) {
        let config = self.config.clone();
        self.sim.reset(
            config.mine_count,
            config.board_width,
            config.board_height,
            &mut self.rng,
        );
        let row = self.rng.gen_range_usize(0..self.sim.height());
        let col = self.rng.gen_range_usize(0..self.sim.width());
        self.sim.reveal(row, col);

        while self.sim.status() == GameStatus::InProgress {
            let grid = self.sim.grid();
            let features = self.extractor.features(&grid);
            let labels = self.extractor.labels(&self.sim);

            match labeled_batch(&features, &labels) {
                None => {
                    // No window carries mine information yet: reveal a
                    // uniformly random cell — any cell, revealed or not —
                    // and try again without a learning step.
                    let r = self.rng.gen_range_usize(0..self.sim.height());
                    let c = self.rng.gen_range_usize(0..self.sim.width());
                    self.sim.reveal(r, c);
                    continue;
                }
                Some((x, y)) => {
                    if let Some((loss, grads)) =
                        self.classifier.loss(&x, &y, config.regularization)
                    {
                        debug!(loss = loss as f64, batch = y.len(), "learning step");
                        report.loss_history.push(loss);
                        self.classifier.step(&grads, config.learning_rate);
                    }
                }
            }

            match random_hidden_cell(&grid, &mut self.rng) {
                Some((r, c)) => self.sim.reveal(r, c),
                // No hidden cell left; the simulator should already have
                // reported a terminal state.
                None => break,
            }
        }
    }
}

/// Uniformly random hidden cell, or `None` if nothing is hidden.
///
/// Rejection-samples raw coordinates for a bounded number of attempts,
/// then falls back to scanning the hidden cells and choosing among them —
/// the same uniform distribution, without the unbounded tail.
fn random_hidden_cell(grid: &BoardGrid, rng: &mut GameRng) -> Option<(usize, usize)> {
    let attempts = grid.len() * REJECTION_ATTEMPTS_PER_CELL;
    for _ in 0..attempts {
        let row = rng.gen_range_usize(0..grid.height());
        let col = rng.gen_range_usize(0..grid.width());
        if grid.is_hidden(row, col) {
            return Some((row, col));
        }
    }
    rng.choose(&grid.hidden_cells()).copied()
}
