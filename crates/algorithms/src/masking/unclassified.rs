//! Unclassified pixel masking
//!
//! Ground-truth label `0` marks background pixels that carry no class.
//! Predictions are shifted by one so that `0` stays reserved for them.

use hypereval_core::{
    select_rows, ClassId, FlatIndex, Grid, GridElement, LabeledGrid, PredictionGrid, SampleMatrix,
};
use hypereval_core::{Error, Result};
use ndarray::ArrayView2;
use tracing::debug;

/// Label value of unclassified (background) pixels
pub const UNCLASSIFIED: ClassId = 0;

/// Force unclassified pixels to `0` in a prediction grid.
///
/// Every cell where `labels == 0` becomes `0`; every other cell becomes
/// `pred + 1`, so a cluster originally numbered `0` stays distinguishable
/// from background.
///
/// # Errors
/// - [`Error::ShapeMismatch`] if the grids differ in shape
/// - [`Error::InvalidParameter`] if a prediction cannot be shifted
pub fn mask_predictions(preds: &PredictionGrid, labels: &LabeledGrid) -> Result<Grid<ClassId>> {
    labels.ensure_same_shape(preds)?;

    let data = preds
        .iter()
        .zip(labels.iter())
        .map(|(pred, label)| {
            if label == UNCLASSIFIED {
                return Ok(UNCLASSIFIED);
            }
            pred.checked_add(1).ok_or_else(|| Error::InvalidParameter {
                name: "preds",
                value: pred.to_string(),
                reason: "prediction id cannot be shifted past the reserved 0".into(),
            })
        })
        .collect::<Result<Vec<ClassId>>>()?;

    Grid::from_vec(data, preds.rows(), preds.cols())
}

/// Drop the samples of unclassified pixels from a sample matrix.
///
/// `samples` has one row per grid cell in row-major order. The retained
/// rows keep their relative order and are returned together with their
/// original flat indices.
///
/// # Errors
/// [`Error::ShapeMismatch`] if `samples` does not have one row per label cell
pub fn mask_input(
    samples: ArrayView2<'_, f64>,
    labels: &LabeledGrid,
) -> Result<(SampleMatrix, FlatIndex)> {
    if samples.nrows() != labels.len() {
        return Err(Error::ShapeMismatch {
            expected: (labels.len(), samples.ncols()),
            actual: samples.dim(),
        });
    }

    let kept: FlatIndex = labels
        .iter()
        .enumerate()
        .filter(|&(_, label)| label != UNCLASSIFIED)
        .map(|(k, _)| k)
        .collect();

    debug!(
        retained = kept.len(),
        dropped = labels.len() - kept.len(),
        "masked unclassified samples"
    );

    Ok((select_rows(samples, &kept), kept))
}

/// Scatter per-sample values back onto a full grid.
///
/// Inverse of [`mask_input`]: `values[i]` is written at flat position
/// `flat_index[i]`, every other cell receives `fill`.
///
/// # Errors
/// - [`Error::SizeMismatch`] if `values` and `flat_index` differ in length
/// - [`Error::IndexOutOfBounds`] if an index lies outside `shape`
pub fn unmask<T: GridElement>(
    values: &[T],
    flat_index: &FlatIndex,
    shape: (usize, usize),
    fill: T,
) -> Result<Grid<T>> {
    if values.len() != flat_index.len() {
        return Err(Error::SizeMismatch {
            expected: flat_index.len(),
            actual: values.len(),
        });
    }

    let (rows, cols) = shape;
    let mut data = vec![fill; rows * cols];
    for (&value, &k) in values.iter().zip(flat_index) {
        match data.get_mut(k) {
            Some(cell) => *cell = value,
            None => {
                return Err(Error::IndexOutOfBounds {
                    row: k / cols.max(1),
                    col: k % cols.max(1),
                    rows,
                    cols,
                })
            }
        }
    }

    Grid::from_vec(data, rows, cols)
}

/// Keep only the cells of one class, zeroing everything else
pub fn isolate_class(labels: &LabeledGrid, class: ClassId) -> LabeledGrid {
    labels.map(|label| if label == class { label } else { UNCLASSIFIED })
}
