//! Risk-map aggregation and lowest-risk move choice.

use ndarray::Array2;

use crate::board::BoardGrid;
use crate::nn::PatchClassifier;
use crate::patch::PatchExtractor;

/// Score of a cell no window has voted on yet. Below any probability, so
/// unvoted cells are preferred over everything the network has flagged.
const UNSCORED: f32 = -1.0;

/// Score assigned to a rejected (already revealed) cell during move
/// selection, removing it from contention.
const REJECTED: f32 = 1.0;

/// Per-cell mine-risk estimates aggregated from overlapping window votes.
///
/// Overlap resolution is pessimistic: every window covering a cell votes
/// with its probability for the cell's position, and the maximum vote
/// stands. A cell is treated as risky if any window considers it risky.
#[derive(Clone, Debug)]
pub struct RiskMap {
    scores: Array2<f32>,
}

impl RiskMap {
    /// Create a map with every cell unscored.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            scores: Array2::from_elem((height, width), UNSCORED),
        }
    }

    /// Record one window's vote for the cell at `(row, col)`: the maximum
    /// of the current score and `probability` stands.
    pub fn vote(&mut self, row: usize, col: usize, probability: f32) {
        let score = &mut self.scores[[row, col]];
        *score = score.max(probability);
    }

    /// Current score of the cell at `(row, col)`.
    #[must_use]
    pub fn score(&self, row: usize, col: usize) -> f32 {
        self.scores[[row, col]]
    }

    /// The aggregated score grid, `height × width`.
    #[must_use]
    pub fn scores(&self) -> &Array2<f32> {
        &self.scores
    }

    /// Select the lowest-risk hidden cell.
    ///
    /// Takes the global minimum of the score grid; whenever the minimum
    /// falls on a cell that is not hidden, that cell's score is overwritten
    /// with maximum risk and the search repeats. The loop is bounded by the
    /// cell count; `None` means no hidden cell remains, which callers treat
    /// as "the game is already over", not as an error.
    pub fn select_move(&mut self, grid: &BoardGrid) -> Option<(usize, usize)> {
        debug_assert_eq!(self.scores.nrows(), grid.height());
        debug_assert_eq!(self.scores.ncols(), grid.width());

        for _ in 0..self.scores.len() {
            let ((row, col), _) = self
                .scores
                .indexed_iter()
                .min_by(|a, b| a.1.total_cmp(b.1))?;
            if grid.is_hidden(row, col) {
                return Some((row, col));
            }
            self.scores[[row, col]] = REJECTED;
        }
        None
    }
}

/// Run the classifier over the visible board and fold the per-window,
/// per-position probabilities into a [`RiskMap`].
#[must_use]
pub fn predict_risk_map(
    classifier: &PatchClassifier,
    extractor: &PatchExtractor,
    grid: &BoardGrid,
) -> RiskMap {
    let x = extractor.features(grid);
    let probs = classifier.predict(&x);

    let mut map = RiskMap::new(grid.height(), grid.width());
    for (patch, row) in probs.outer_iter().enumerate() {
        for (position, &probability) in row.iter().enumerate() {
            let (r, c) = extractor.cell_of(patch, position, grid.width());
            map.vote(r, c, probability);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HIDDEN;
    use crate::core::GameRng;

    #[test]
    fn test_vote_keeps_maximum() {
        let mut map = RiskMap::new(4, 4);
        map.vote(1, 2, 0.3);
        map.vote(1, 2, 0.7);
        map.vote(1, 2, 0.5);
        assert_eq!(map.score(1, 2), 0.7);
    }

    #[test]
    fn test_unvoted_cells_preferred() {
        let grid = BoardGrid::new(vec![HIDDEN; 4], 2, 2);
        let mut map = RiskMap::new(2, 2);
        map.vote(0, 0, 0.1);
        map.vote(0, 1, 0.2);
        map.vote(1, 0, 0.05);
        // (1, 1) was never voted on; its sentinel is below every probability.
        assert_eq!(map.select_move(&grid), Some((1, 1)));
    }

    #[test]
    fn test_select_move_skips_revealed_cells() {
        // Lowest score sits on a revealed cell; selection must reject it.
        let grid = BoardGrid::new(vec![2, HIDDEN, HIDDEN, HIDDEN], 2, 2);
        let mut map = RiskMap::new(2, 2);
        map.vote(0, 0, 0.01);
        map.vote(0, 1, 0.5);
        map.vote(1, 0, 0.4);
        map.vote(1, 1, 0.6);
        assert_eq!(map.select_move(&grid), Some((1, 0)));
        // The rejected cell was pushed to maximum risk.
        assert_eq!(map.score(0, 0), 1.0);
    }

    #[test]
    fn test_select_move_none_when_nothing_hidden() {
        let grid = BoardGrid::new(vec![0, 1, 2, 3], 2, 2);
        let mut map = RiskMap::new(2, 2);
        assert_eq!(map.select_move(&grid), None);
    }

    #[test]
    fn test_risk_map_covers_every_cell() {
        // Every cell of an 8x8 board is covered by at least one window, so
        // no sentinel may survive the fold.
        let mut rng = GameRng::new(42);
        let classifier = PatchClassifier::new(9, 100, 9, &mut rng);
        let extractor = PatchExtractor::new(3);
        let grid = BoardGrid::new(vec![HIDDEN; 64], 8, 8);

        let map = predict_risk_map(&classifier, &extractor, &grid);
        assert!(map.scores().iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_risk_scores_are_probabilities() {
        let mut rng = GameRng::new(7);
        let classifier = PatchClassifier::new(9, 100, 9, &mut rng);
        let extractor = PatchExtractor::new(3);
        let grid = BoardGrid::new(vec![HIDDEN; 64], 8, 8);

        let map = predict_risk_map(&classifier, &extractor, &grid);
        assert!(map.scores().iter().all(|&s| (0.0..=1.0).contains(&s)));
    }
}
