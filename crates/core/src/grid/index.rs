//! Conversion between 2D grid positions and row-major sample order

use serde::{Deserialize, Serialize};

/// A `(row, col)` position in a grid
pub type GridPos = (usize, usize);

/// Row-major indexing helper for a grid of fixed shape.
///
/// Sample `k` of a flattened grid lives at `(k / cols, k % cols)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridIndex {
    rows: usize,
    cols: usize,
}

impl GridIndex {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `pos` lies inside the grid
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.0 < self.rows && pos.1 < self.cols
    }

    /// Flat (row-major) index of `(row, col)`
    #[inline]
    pub fn flat(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols, "flat: position outside grid");
        row * self.cols + col
    }

    /// Grid position of a flat index
    #[inline]
    pub fn position(&self, flat: usize) -> GridPos {
        debug_assert!(flat < self.len(), "position: flat index outside grid");
        (flat / self.cols, flat % self.cols)
    }

    /// All positions in row-major scan order
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let cols = self.cols;
        (0..self.len()).map(move |k| (k / cols, k % cols))
    }
}
