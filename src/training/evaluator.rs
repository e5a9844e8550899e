//! Win-rate measurement with greedy classifier play.

use tracing::debug;

use crate::board::{BoardSim, GameStatus};
use crate::core::{GameRng, TrainerConfig};
use crate::nn::PatchClassifier;
use crate::patch::PatchExtractor;
use crate::policy::predict_risk_map;

/// Plays full games with the classifier's greedy lowest-risk policy and
/// reports the fraction won.
///
/// Purely an observer: no exploration, no learning, no state carried
/// between games beyond the win counter.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator {
    extractor: PatchExtractor,
    mine_count: usize,
    board_width: usize,
    board_height: usize,
}

impl Evaluator {
    /// Create an evaluator for the given board setup.
    #[must_use]
    pub fn new(
        patch_size: usize,
        mine_count: usize,
        board_width: usize,
        board_height: usize,
    ) -> Self {
        Self {
            extractor: PatchExtractor::new(patch_size),
            mine_count,
            board_width,
            board_height,
        }
    }

    /// Create an evaluator matching a trainer's board setup.
    #[must_use]
    pub fn from_config(config: &TrainerConfig) -> Self {
        Self::new(
            config.patch_size,
            config.mine_count,
            config.board_width,
            config.board_height,
        )
    }

    /// Play `games` independent games and return wins / games.
    ///
    /// Each game opens with one uniformly random reveal, then follows the
    /// lowest-risk hidden cell until the game ends.
    pub fn win_rate<S: BoardSim>(
        &self,
        sim: &mut S,
        classifier: &PatchClassifier,
        games: usize,
        rng: &mut GameRng,
    ) -> f64 {
        if games == 0 {
            return 0.0;
        }

        let mut wins = 0;
        for game in 0..games {
            if self.play_game(sim, classifier, rng) == GameStatus::Won {
                wins += 1;
            }
            debug!(game, wins, "evaluation game finished");
        }
        wins as f64 / games as f64
    }

    fn play_game<S: BoardSim>(
        &self,
        sim: &mut S,
        classifier: &PatchClassifier,
        rng: &mut GameRng,
    ) -> GameStatus {
        sim.reset(self.mine_count, self.board_width, self.board_height, rng);
        let row = rng.gen_range_usize(0..sim.height());
        let col = rng.gen_range_usize(0..sim.width());
        sim.reveal(row, col);

        while sim.status() == GameStatus::InProgress {
            let grid = sim.grid();
            let mut risk = predict_risk_map(classifier, &self.extractor, &grid);
            match risk.select_move(&grid) {
                Some((r, c)) => sim.reveal(r, c),
                // Nothing hidden remains; the simulator is already terminal.
                None => break,
            }
        }
        sim.status()
    }
}
