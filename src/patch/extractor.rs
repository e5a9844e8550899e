//! Board → patch batch encoding and its inverse index mapping.

use ndarray::Array2;

use crate::board::{BoardGrid, BoardSim, MINE};

/// Scale applied to raw cell values before they enter the network.
const FEATURE_SCALE: f32 = 0.001;

/// Extracts overlapping k×k windows from the board.
///
/// An H×W board yields exactly `(H−k+1)·(W−k+1)` windows, enumerated in
/// row-major order of their top-left offset; each window is flattened
/// row-major into one feature row. Windows overlap — adjacent windows
/// shift by a single cell — so every interior cell is seen by several
/// windows at different positions.
#[derive(Clone, Copy, Debug)]
pub struct PatchExtractor {
    patch_size: usize,
}

impl Default for PatchExtractor {
    fn default() -> Self {
        Self { patch_size: 3 }
    }
}

impl PatchExtractor {
    /// Create an extractor with the given window side length.
    #[must_use]
    pub fn new(patch_size: usize) -> Self {
        assert!(patch_size > 0, "patch size must be positive");
        Self { patch_size }
    }

    /// Window side length.
    #[must_use]
    pub fn patch_size(&self) -> usize {
        self.patch_size
    }

    /// Flattened window length (the classifier's input and output width).
    #[must_use]
    pub fn patch_len(&self) -> usize {
        self.patch_size * self.patch_size
    }

    /// Number of windows along one axis of the given length.
    fn spans(&self, axis_len: usize) -> usize {
        assert!(
            axis_len >= self.patch_size,
            "board axis {} shorter than patch size {}",
            axis_len,
            self.patch_size
        );
        axis_len - self.patch_size + 1
    }

    /// Total number of windows on a `height`×`width` board.
    #[must_use]
    pub fn patch_count(&self, width: usize, height: usize) -> usize {
        self.spans(height) * self.spans(width)
    }

    /// Encode the visible board as a feature matrix: one row per window,
    /// `patch_len` columns, cell values scaled by `0.001`.
    #[must_use]
    pub fn features(&self, grid: &BoardGrid) -> Array2<f32> {
        let k = self.patch_size;
        let row_spans = self.spans(grid.height());
        let col_spans = self.spans(grid.width());

        let mut x = Array2::zeros((row_spans * col_spans, k * k));
        for r0 in 0..row_spans {
            for c0 in 0..col_spans {
                let patch = r0 * col_spans + c0;
                for p in 0..k * k {
                    x[[patch, p]] = grid.at(r0 + p / k, c0 + p % k) as f32 * FEATURE_SCALE;
                }
            }
        }
        x
    }

    /// Ground-truth label per window: the row-major position of the first
    /// mine inside the window, or `None` for a mine-free window.
    ///
    /// Labels read the simulator's ground truth, not the visible grid, so
    /// they are defined from the moment mines are placed.
    #[must_use]
    pub fn labels<S: BoardSim + ?Sized>(&self, sim: &S) -> Vec<Option<usize>> {
        let k = self.patch_size;
        let row_spans = self.spans(sim.height());
        let col_spans = self.spans(sim.width());

        let mut labels = Vec::with_capacity(row_spans * col_spans);
        for r0 in 0..row_spans {
            for c0 in 0..col_spans {
                let mine_pos = (0..k * k).find(|&p| sim.value_at(r0 + p / k, c0 + p % k) == MINE);
                labels.push(mine_pos);
            }
        }
        labels
    }

    /// Map a window index and a position inside it back to the board cell
    /// it covers. Inverse of the row-major sliding-window enumeration.
    #[must_use]
    pub fn cell_of(&self, patch: usize, position: usize, board_width: usize) -> (usize, usize) {
        let k = self.patch_size;
        debug_assert!(position < k * k);
        let col_spans = self.spans(board_width);
        let row = patch / col_spans + position / k;
        let col = patch % col_spans + position % k;
        (row, col)
    }
}

/// Assemble the learning batch from a full feature matrix and per-window
/// labels: rows whose window contains a mine, paired with the mine's
/// position class.
///
/// Returns `None` when no window carries a label — the caller should treat
/// the turn as carrying no trainable signal and explore instead.
#[must_use]
pub fn labeled_batch(
    features: &Array2<f32>,
    labels: &[Option<usize>],
) -> Option<(Array2<f32>, Vec<usize>)> {
    debug_assert_eq!(features.nrows(), labels.len());

    let picked: Vec<(usize, usize)> = labels
        .iter()
        .enumerate()
        .filter_map(|(patch, label)| label.map(|pos| (patch, pos)))
        .collect();
    if picked.is_empty() {
        return None;
    }

    let mut x = Array2::zeros((picked.len(), features.ncols()));
    let mut y = Vec::with_capacity(picked.len());
    for (row, &(patch, pos)) in picked.iter().enumerate() {
        x.row_mut(row).assign(&features.row(patch));
        y.push(pos);
    }
    Some((x, y))
}
