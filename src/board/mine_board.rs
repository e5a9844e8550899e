//! Reference board simulator.

use crate::core::GameRng;

use super::grid::{BoardGrid, HIDDEN, MINE};
use super::sim::{BoardSim, GameStatus};

/// In-memory minesweeper board.
///
/// Ground truth (mine layout and adjacency counts) is fixed at `reset`;
/// play only flips per-cell revealed flags. A fresh `MineBoard` is empty
/// and must be `reset` before play.
#[derive(Clone, Debug)]
pub struct MineBoard {
    /// Ground truth per cell, row-major: `MINE` or the 8-neighbourhood
    /// mine count.
    truth: Vec<i32>,
    revealed: Vec<bool>,
    width: usize,
    height: usize,
    mine_count: usize,
    revealed_count: usize,
    status: GameStatus,
}

impl Default for MineBoard {
    fn default() -> Self {
        Self {
            truth: Vec::new(),
            revealed: Vec::new(),
            width: 0,
            height: 0,
            mine_count: 0,
            revealed_count: 0,
            status: GameStatus::InProgress,
        }
    }
}

impl MineBoard {
    /// Create an empty board. Call [`BoardSim::reset`] before playing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mines on the current board.
    #[must_use]
    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({}, {}) outside {}x{} board",
            row,
            col,
            self.height,
            self.width
        );
        row * self.width + col
    }

    fn neighbor_mine_count(mines: &[bool], width: usize, height: usize, idx: usize) -> i32 {
        let (row, col) = (idx / width, idx % width);
        let mut count = 0;
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (nr, nc) = (row as i64 + dr, col as i64 + dc);
                if nr < 0 || nc < 0 || nr >= height as i64 || nc >= width as i64 {
                    continue;
                }
                if mines[nr as usize * width + nc as usize] {
                    count += 1;
                }
            }
        }
        count
    }
}

impl BoardSim for MineBoard {
    fn reset(&mut self, mine_count: usize, width: usize, height: usize, rng: &mut GameRng) {
        let cells = width * height;
        assert!(width > 0 && height > 0, "board must have at least one cell");
        assert!(
            mine_count < cells,
            "{} mines do not fit a {}x{} board with room to win",
            mine_count,
            height,
            width
        );

        // Uniform placement without replacement: shuffle cell indices and
        // take the first mine_count.
        let mut indices: Vec<usize> = (0..cells).collect();
        rng.shuffle(&mut indices);
        let mut mines = vec![false; cells];
        for &idx in &indices[..mine_count] {
            mines[idx] = true;
        }

        self.truth = (0..cells)
            .map(|idx| {
                if mines[idx] {
                    MINE
                } else {
                    Self::neighbor_mine_count(&mines, width, height, idx)
                }
            })
            .collect();
        self.revealed = vec![false; cells];
        self.width = width;
        self.height = height;
        self.mine_count = mine_count;
        self.revealed_count = 0;
        self.status = GameStatus::InProgress;
    }

    fn reveal(&mut self, row: usize, col: usize) {
        if self.status() != GameStatus::InProgress {
            return;
        }
        let idx = self.index(row, col);
        if self.revealed[idx] {
            return;
        }
        self.revealed[idx] = true;
        if self.truth[idx] == MINE {
            self.status = GameStatus::Lost;
        } else {
            self.revealed_count += 1;
            if self.revealed_count == self.truth.len() - self.mine_count {
                self.status = GameStatus::Won;
            }
        }
    }

    fn grid(&self) -> BoardGrid {
        let cells = self
            .truth
            .iter()
            .zip(&self.revealed)
            .map(|(&value, &shown)| if shown { value } else { HIDDEN })
            .collect();
        BoardGrid::new(cells, self.width, self.height)
    }

    fn value_at(&self, row: usize, col: usize) -> i32 {
        self.truth[self.index(row, col)]
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn status(&self) -> GameStatus {
        self.status
    }
}
