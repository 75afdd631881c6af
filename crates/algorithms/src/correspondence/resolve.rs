//! Rank-based renumbering of classes and clusters

use std::collections::HashMap;

use hypereval_core::{ClassId, Grid, LabeledGrid, PredictionGrid};
use hypereval_core::{Error, Result};
use tracing::debug;

use super::ClassCounts;
use crate::masking::UNCLASSIFIED;

/// Ground truth and predictions renumbered onto the canonical id space.
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondence {
    /// Labels with canonical ids `1..=n_cluster`
    pub labels: LabeledGrid,
    /// Predictions with canonical ids, `0` wherever the ground truth is `0`
    pub preds: PredictionGrid,
    /// `(raw label, canonical id)` pairs, by ascending label population
    pub label_mapping: Vec<(ClassId, ClassId)>,
    /// `(raw cluster, canonical id)` pairs, by ascending cluster population
    pub pred_mapping: Vec<(ClassId, ClassId)>,
}

/// Renumber ground-truth classes and predicted clusters by population rank.
///
/// With `L`, `P` the distinct label and prediction values and
/// `offset = |L| - |P|`:
/// - the label of rank `i` (ascending population) becomes `i + 1`
/// - the `j`-th cluster by ascending population becomes `j + offset + 1`,
///   so the most populated cluster lines up with the most populated class
/// - cells whose ground truth is `0` are `0` in the returned predictions
///
/// Values are matched against the original grids; neither input is modified.
///
/// # Errors
/// - [`Error::ShapeMismatch`] if the grids differ in shape
/// - [`Error::Configuration`] if `n_cluster` differs from the number of
///   distinct label values, or a cluster id lies outside `0..n_cluster`
///
/// # Example
/// ```ignore
/// let labels = Grid::from_array(array![[0, 1, 1], [2, 2, 2]]);
/// let preds = Grid::from_array(array![[2, 2, 0], [0, 1, 1]]);
/// let aligned = resolve_correspondence(&labels, &preds, 3)?;
/// // aligned.labels == [[1, 2, 2], [3, 3, 3]]
/// // aligned.preds  == [[0, 3, 1], [1, 2, 2]]
/// ```
pub fn resolve_correspondence(
    labels: &LabeledGrid,
    preds: &PredictionGrid,
    n_cluster: usize,
) -> Result<Correspondence> {
    labels.ensure_same_shape(preds)?;

    let label_counts = ClassCounts::from_grid(labels);
    let pred_counts = ClassCounts::from_grid(preds);

    if n_cluster != label_counts.len() {
        return Err(Error::Configuration(format!(
            "n_cluster = {} but the ground truth has {} distinct values; {}",
            n_cluster,
            label_counts.len(),
            if n_cluster < label_counts.len() {
                "the most populated classes would keep their raw ids"
            } else {
                "there are not enough classes to rank"
            }
        )));
    }

    if let Some(&raw) = pred_counts.values().iter().find(|&&v| v as usize >= n_cluster) {
        return Err(Error::Configuration(format!(
            "cluster id {} lies outside 0..{}; clusters must be numbered densely from 0",
            raw, n_cluster
        )));
    }

    // Every cluster id is below n_cluster == |L|, hence |P| <= |L|
    let offset = label_counts.len() - pred_counts.len();

    let mut label_mapping = Vec::with_capacity(label_counts.len());
    let mut pred_mapping = Vec::with_capacity(pred_counts.len());
    let mut j = 0;
    for i in 0..n_cluster {
        if pred_counts.contains(i as ClassId) {
            let raw = pred_counts.values()[pred_counts.rank()[j]];
            pred_mapping.push((raw, canonical(j + offset + 1)?));
            j += 1;
        }
        let raw = label_counts.values()[label_counts.rank()[i]];
        label_mapping.push((raw, canonical(i + 1)?));
    }

    debug!(
        n_cluster,
        offset,
        ?label_mapping,
        ?pred_mapping,
        "resolved label/cluster correspondence"
    );

    let label_lookup: HashMap<ClassId, ClassId> = label_mapping.iter().copied().collect();
    let pred_lookup: HashMap<ClassId, ClassId> = pred_mapping.iter().copied().collect();

    let mut res_labels = Vec::with_capacity(labels.len());
    let mut res_preds = Vec::with_capacity(preds.len());
    for (label, pred) in labels.iter().zip(preds.iter()) {
        res_labels.push(label_lookup.get(&label).copied().unwrap_or(label));
        res_preds.push(if label == UNCLASSIFIED {
            UNCLASSIFIED
        } else {
            pred_lookup.get(&pred).copied().unwrap_or(pred)
        });
    }

    let (rows, cols) = labels.shape();
    Ok(Correspondence {
        labels: Grid::from_vec(res_labels, rows, cols)?,
        preds: Grid::from_vec(res_preds, rows, cols)?,
        label_mapping,
        pred_mapping,
    })
}

fn canonical(id: usize) -> Result<ClassId> {
    ClassId::try_from(id)
        .map_err(|_| Error::Configuration(format!("canonical id {} does not fit a class id", id)))
}
