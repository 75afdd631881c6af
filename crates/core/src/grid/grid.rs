//! Main Grid type

use crate::error::{Error, Result};
use crate::grid::{GridElement, GridIndex};
use ndarray::{Array2, ArrayView2};

/// A 2D grid of per-pixel values.
///
/// `Grid<T>` stores cell values of type `T` in row-major order. Label
/// grids, prediction grids and single-band images all share this type.
///
/// # Example
///
/// ```ignore
/// use hypereval_core::Grid;
///
/// let mut labels: Grid<u32> = Grid::new(145, 145);
/// labels.set(10, 20, 3)?;
/// assert_eq!(labels.get(10, 20)?, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: GridElement> {
    data: Array2<T>,
}

impl<T: GridElement> Grid<T> {
    /// Create a new grid filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Create a new grid filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create a grid from row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Create a grid from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data }
    }

    /// Create a grid with the same dimensions, filled with a value
    pub fn like<U: GridElement>(&self, fill_value: U) -> Grid<U> {
        Grid {
            data: Array2::from_elem(self.data.dim(), fill_value),
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major index helper for this grid's shape
    pub fn index(&self) -> GridIndex {
        GridIndex::new(self.rows(), self.cols())
    }

    /// Fail with [`Error::ShapeMismatch`] unless `other` has the same shape
    pub fn ensure_same_shape<U: GridElement>(&self, other: &Grid<U>) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        Ok(())
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Iterate over cell values in row-major order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    /// Cell values flattened in row-major order
    pub fn to_flat_vec(&self) -> Vec<T> {
        self.data.iter().copied().collect()
    }

    /// Apply `f` to every cell, producing a grid of the same shape
    pub fn map<U: GridElement, F: Fn(T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            data: self.data.mapv(f),
        }
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }
}
