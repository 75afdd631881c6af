//! Outlier exclusion and reconstruction
//!
//! Outliers are removed before clustering and reinserted as `0` when the
//! per-sample predictions are scattered back onto the scene.

use hypereval_core::{Grid, GridElement, GridIndex, OutlierSet, PositionIndex, SampleMatrix};
use hypereval_core::{Error, Result};
use ndarray::{Array2, ArrayView3};
use tracing::debug;

/// Drop outlier pixels from a `(rows, cols, bands)` feature cube.
///
/// Pixels are visited in row-major order; each retained pixel contributes
/// one row (its spectrum) and its `(row, col)` position. Outlier positions
/// lying outside the cube never match and are ignored.
pub fn exclude_outliers(
    cube: ArrayView3<'_, f64>,
    outliers: &OutlierSet,
) -> Result<(SampleMatrix, PositionIndex)> {
    let (rows, cols, bands) = cube.dim();
    let index = GridIndex::new(rows, cols);

    let mut data = Vec::with_capacity(index.len() * bands);
    let mut positions = PositionIndex::with_capacity(index.len());
    for (r, c) in index.positions() {
        if outliers.contains(&(r, c)) {
            continue;
        }
        data.extend((0..bands).map(|b| cube[[r, c, b]]));
        positions.push((r, c));
    }

    debug!(
        retained = positions.len(),
        dropped = index.len() - positions.len(),
        "excluded outlier pixels"
    );

    let samples = Array2::from_shape_vec((positions.len(), bands), data)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok((samples, positions))
}

/// Drop outlier pixels from a single-band grid.
///
/// Same scan order and position bookkeeping as [`exclude_outliers`], with
/// one value per retained pixel.
pub fn exclude_outliers_grid<T: GridElement>(
    grid: &Grid<T>,
    outliers: &OutlierSet,
) -> (Vec<T>, PositionIndex) {
    grid.index()
        .positions()
        .zip(grid.iter())
        .filter(|(pos, _)| !outliers.contains(pos))
        .map(|(pos, value)| (value, pos))
        .unzip()
}

/// Rebuild a full grid from retained samples and the outlier set.
///
/// `values[i]` is written at `positions[i]`; every outlier position is set
/// to `0`. Together, `positions` and `outliers` must cover each cell of
/// `shape` exactly once.
///
/// # Errors
/// - [`Error::SizeMismatch`] if `values` and `positions` differ in length
/// - [`Error::IndexOutOfBounds`] if any position lies outside `shape`
/// - [`Error::CoverageViolation`] if some cell would be left unwritten
pub fn reconstruct<T: GridElement>(
    values: &[T],
    positions: &PositionIndex,
    outliers: &OutlierSet,
    shape: (usize, usize),
) -> Result<Grid<T>> {
    if values.len() != positions.len() {
        return Err(Error::SizeMismatch {
            expected: positions.len(),
            actual: values.len(),
        });
    }

    let index = GridIndex::new(shape.0, shape.1);
    let total = index.len();
    if positions.len() + outliers.len() != total {
        return Err(Error::CoverageViolation {
            covered: positions.len() + outliers.len(),
            total,
        });
    }

    let mut grid = Grid::new(shape.0, shape.1);
    let mut written = vec![false; total];

    let cells = positions
        .iter()
        .zip(values.iter().copied())
        .chain(outliers.iter().map(|pos| (pos, T::zero())));
    for (&(row, col), value) in cells {
        grid.set(row, col, value)?;
        written[index.flat(row, col)] = true;
    }

    let covered = written.iter().filter(|&&w| w).count();
    if covered != total {
        return Err(Error::CoverageViolation { covered, total });
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    fn outliers() -> OutlierSet {
        [(0, 1), (1, 2)].into_iter().collect()
    }

    #[test]
    fn test_exclude_outliers_cube() {
        let cube = Array3::from_shape_fn((2, 3, 2), |(r, c, b)| (r * 100 + c * 10 + b) as f64);
        let (samples, positions) = exclude_outliers(cube.view(), &outliers()).unwrap();

        assert_eq!(positions, vec![(0, 0), (0, 2), (1, 0), (1, 1)]);
        assert_eq!(samples.dim(), (4, 2));
        assert_eq!(samples.row(1).to_vec(), vec![20.0, 21.0]);
        assert_eq!(samples.row(3).to_vec(), vec![110.0, 111.0]);
    }

    #[test]
    fn test_exclude_outliers_ignores_positions_outside_grid() {
        let cube = Array3::<f64>::zeros((2, 2, 1));
        let outliers: OutlierSet = [(5, 5)].into_iter().collect();
        let (samples, positions) = exclude_outliers(cube.view(), &outliers).unwrap();
        assert_eq!(samples.nrows(), 4);
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn test_exclude_reconstruct_roundtrip() {
        let grid = Grid::from_array(array![[4u32, 5, 6], [7, 8, 9]]);
        let outliers = outliers();

        let (values, positions) = exclude_outliers_grid(&grid, &outliers);
        assert_eq!(values, vec![4, 6, 7, 8]);

        let rebuilt = reconstruct(&values, &positions, &outliers, grid.shape()).unwrap();
        for (r, c) in grid.index().positions() {
            let expected = if outliers.contains(&(r, c)) { 0 } else { grid.get(r, c).unwrap() };
            assert_eq!(rebuilt.get(r, c).unwrap(), expected);
        }
    }

    #[test]
    fn test_reconstruct_writes_predictions() {
        let positions = vec![(0, 0), (0, 2), (1, 0), (1, 1)];
        let rebuilt = reconstruct(&[1.0, 2.0, 3.0, 4.0], &positions, &outliers(), (2, 3)).unwrap();
        assert_eq!(rebuilt, Grid::from_array(array![[1.0, 0.0, 2.0], [3.0, 4.0, 0.0]]));
    }

    #[test]
    fn test_reconstruct_incomplete_cover() {
        let positions = vec![(0, 0), (0, 2), (1, 0)];
        let result = reconstruct(&[1u32, 2, 3], &positions, &outliers(), (2, 3));
        assert!(matches!(
            result,
            Err(Error::CoverageViolation { covered: 5, total: 6 })
        ));
    }

    #[test]
    fn test_reconstruct_overlapping_cover() {
        // Right count, but (0, 1) is both retained and an outlier, leaving (1, 1) unwritten
        let positions = vec![(0, 0), (0, 1), (0, 2), (1, 0)];
        let result = reconstruct(&[1u32, 2, 3, 4], &positions, &outliers(), (2, 3));
        assert!(matches!(
            result,
            Err(Error::CoverageViolation { covered: 5, total: 6 })
        ));
    }

    #[test]
    fn test_reconstruct_length_and_bounds() {
        let positions = vec![(0, 0), (0, 2), (1, 0), (1, 1)];
        assert!(matches!(
            reconstruct(&[1u32, 2], &positions, &outliers(), (2, 3)),
            Err(Error::SizeMismatch { .. })
        ));

        let positions = vec![(0, 0), (0, 2), (1, 0), (2, 0)];
        assert!(matches!(
            reconstruct(&[1u32, 2, 3, 4], &positions, &outliers(), (2, 3)),
            Err(Error::IndexOutOfBounds { row: 2, col: 0, .. })
        ));
    }
}
