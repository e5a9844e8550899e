//! Simulator trait: the capability set the learning pipeline consumes.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

use super::grid::BoardGrid;

/// Outcome state of the current game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves remain and no mine has been revealed.
    InProgress,
    /// Every non-mine cell has been revealed.
    Won,
    /// A mine was revealed.
    Lost,
}

impl GameStatus {
    /// Whether the game has reached a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Board simulator contract.
///
/// Implementations own the mine layout and all mutable game state; the
/// pipeline only reads snapshots and issues `reveal` actions.
///
/// ## Implementation Notes
///
/// - `reveal` on an already-revealed cell, or after the game has ended,
///   must be a no-op — callers' blind exploration may legally hit both.
/// - `value_at` exposes ground truth regardless of revealed state. It
///   exists solely for label construction and must never influence move
///   choice.
pub trait BoardSim {
    /// Discard the current game and set up a fresh board with `mine_count`
    /// mines placed uniformly at random. Nothing starts revealed.
    fn reset(&mut self, mine_count: usize, width: usize, height: usize, rng: &mut GameRng);

    /// Reveal the cell at `(row, col)`.
    ///
    /// Revealing a mine loses the game; revealing the last safe cell wins
    /// it; otherwise the game continues.
    fn reveal(&mut self, row: usize, col: usize);

    /// Snapshot of the board as the player sees it.
    fn grid(&self) -> BoardGrid;

    /// Ground-truth value at `(row, col)`: [`super::MINE`] for a mine,
    /// the adjacent-mine count otherwise.
    fn value_at(&self, row: usize, col: usize) -> i32;

    /// Board width in cells.
    fn width(&self) -> usize;

    /// Board height in cells.
    fn height(&self) -> usize;

    /// Current game outcome state.
    fn status(&self) -> GameStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminal() {
        assert!(!GameStatus::InProgress.is_terminal());
        assert!(GameStatus::Won.is_terminal());
        assert!(GameStatus::Lost.is_terminal());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&GameStatus::Won).unwrap();
        let back: GameStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GameStatus::Won);
    }
}
