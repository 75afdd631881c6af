//! Sample containers for pixels flattened out of a grid.
//!
//! A [`SampleMatrix`] holds one row per pixel. As long as every pixel of the
//! grid is present, row `k` is pixel `k` in row-major order. Once pixels are
//! removed, the matrix must travel with a [`FlatIndex`] or a
//! [`PositionIndex`] recording where each remaining row came from.

use std::collections::HashSet;

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::{GridIndex, GridPos};

/// Pixels as rows, features (bands, components) as columns
pub type SampleMatrix = Array2<f64>;

/// Original row-major flat index of each retained sample
pub type FlatIndex = Vec<usize>;

/// Original `(row, col)` position of each retained sample
pub type PositionIndex = Vec<GridPos>;

/// Grid positions flagged by an external anomaly detector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutlierSet {
    positions: HashSet<GridPos>,
}

impl OutlierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: GridPos) -> bool {
        self.positions.insert(pos)
    }

    pub fn contains(&self, pos: &GridPos) -> bool {
        self.positions.contains(pos)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridPos> {
        self.positions.iter()
    }

    /// Fail with [`Error::IndexOutOfBounds`] on the first position outside `index`
    pub fn ensure_within(&self, index: &GridIndex) -> Result<()> {
        match self.positions.iter().find(|&&pos| !index.contains(pos)) {
            Some(&(row, col)) => Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: index.rows(),
                cols: index.cols(),
            }),
            None => Ok(()),
        }
    }
}

impl FromIterator<GridPos> for OutlierSet {
    fn from_iter<I: IntoIterator<Item = GridPos>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl Extend<GridPos> for OutlierSet {
    fn extend<I: IntoIterator<Item = GridPos>>(&mut self, iter: I) {
        self.positions.extend(iter);
    }
}

/// Flatten a `(rows, cols, bands)` feature cube into a sample matrix.
///
/// Row `k` of the result is the spectrum of pixel `k` in row-major order.
pub fn cube_to_samples(cube: ArrayView3<'_, f64>) -> Result<SampleMatrix> {
    let (rows, cols, bands) = cube.dim();
    let data: Vec<f64> = cube.iter().copied().collect();
    Array2::from_shape_vec((rows * cols, bands), data).map_err(|e| Error::Other(e.to_string()))
}

/// Copy the given rows of `samples`, in the given order.
///
/// An empty selection yields a `(0, n_features)` matrix.
pub fn select_rows(samples: ArrayView2<'_, f64>, rows: &[usize]) -> SampleMatrix {
    if rows.is_empty() {
        return Array2::zeros((0, samples.ncols()));
    }
    samples.select(Axis(0), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_cube_to_samples_row_major() {
        let cube = Array3::from_shape_fn((2, 3, 4), |(r, c, b)| (r * 100 + c * 10 + b) as f64);
        let samples = cube_to_samples(cube.view()).unwrap();

        assert_eq!(samples.dim(), (6, 4));
        let index = GridIndex::new(2, 3);
        let k = index.flat(1, 2);
        assert_eq!(samples.row(k).to_vec(), vec![120.0, 121.0, 122.0, 123.0]);
    }

    #[test]
    fn test_select_rows() {
        let samples = Array2::from_shape_fn((4, 2), |(k, b)| (k * 10 + b) as f64);
        let picked = select_rows(samples.view(), &[3, 0]);
        assert_eq!(picked.row(0).to_vec(), vec![30.0, 31.0]);
        assert_eq!(picked.row(1).to_vec(), vec![0.0, 1.0]);
        assert_eq!(select_rows(samples.view(), &[]).dim(), (0, 2));
    }

    #[test]
    fn test_outlier_set_membership() {
        let outliers: OutlierSet = [(0, 1), (2, 2), (0, 1)].into_iter().collect();
        assert_eq!(outliers.len(), 2);
        assert!(outliers.contains(&(2, 2)));
        assert!(!outliers.contains(&(1, 1)));
    }

    #[test]
    fn test_outlier_bounds() {
        let outliers: OutlierSet = [(0, 1), (3, 0)].into_iter().collect();
        assert!(outliers.ensure_within(&GridIndex::new(4, 2)).is_ok());
        assert!(matches!(
            outliers.ensure_within(&GridIndex::new(3, 2)),
            Err(Error::IndexOutOfBounds { row: 3, col: 0, .. })
        ));
    }
}
