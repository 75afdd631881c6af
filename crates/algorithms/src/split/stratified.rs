//! Per-class proportional train/test partition

use std::fmt;

use hypereval_core::{select_rows, ClassId, SampleMatrix};
use hypereval_core::{Error, Result};
use ndarray::ArrayView2;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::{shuffle, SplitParams};
use crate::correspondence::ClassCounts;
use crate::report::write_table;

/// Sample order grouping the rows of each class together.
///
/// Rows `order[..counts[0]]` belong to `classes[0]`, the next `counts[1]`
/// rows to `classes[1]`, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGrouping {
    pub order: Vec<usize>,
    pub classes: Vec<ClassId>,
    pub counts: Vec<usize>,
}

/// Group sample indices by class id.
///
/// `order` is a stable argsort of `labels`; classes are ascending.
pub fn group_by_class(labels: &[ClassId]) -> ClassGrouping {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by_key(|&i| labels[i]);

    let counts = ClassCounts::from_values(labels.iter().copied());
    ClassGrouping {
        order,
        classes: counts.values().to_vec(),
        counts: counts.counts().to_vec(),
    }
}

/// Sample counts of one class in a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassSplitCount {
    pub class: ClassId,
    pub train: usize,
    pub test: usize,
    pub total: usize,
}

/// Per-class sample counts of a split
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub classes: Vec<ClassSplitCount>,
}

impl SplitSummary {
    pub fn train_total(&self) -> usize {
        self.classes.iter().map(|c| c.train).sum()
    }

    pub fn test_total(&self) -> usize {
        self.classes.iter().map(|c| c.test).sum()
    }
}

impl fmt::Display for SplitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Vec<String>> = self
            .classes
            .iter()
            .map(|c| {
                vec![
                    c.class.to_string(),
                    c.train.to_string(),
                    c.test.to_string(),
                    c.total.to_string(),
                ]
            })
            .collect();
        write_table(
            f,
            &["Class", "Nb samples train", "Nb samples test", "Nb total samples"],
            &rows,
        )
    }
}

/// Train and test sets with their class ids
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub x_train: SampleMatrix,
    pub x_test: SampleMatrix,
    pub y_train: Vec<ClassId>,
    pub y_test: Vec<ClassId>,
    pub summary: SplitSummary,
}

/// Split grouped samples into train and test sets.
///
/// For each class in `grouping`, the first `floor(count * train_fraction)`
/// rows of its block go to train and the rest to test. Output matrices keep
/// the feature width of `samples`, even when empty.
///
/// # Errors
/// - [`Error::InvalidParameter`] if `train_fraction` is outside `[0, 1]`,
///   `classes` and `counts` differ in length, or `order` points past the
///   last row
/// - [`Error::SizeMismatch`] if the counts (or `order`) do not cover every row
pub fn split(
    samples: ArrayView2<'_, f64>,
    grouping: &ClassGrouping,
    train_fraction: f64,
) -> Result<DatasetSplit> {
    if !(0.0..=1.0).contains(&train_fraction) {
        return Err(Error::InvalidParameter {
            name: "train_fraction",
            value: train_fraction.to_string(),
            reason: "must lie in [0, 1]".into(),
        });
    }
    if grouping.classes.len() != grouping.counts.len() {
        return Err(Error::InvalidParameter {
            name: "grouping",
            value: format!("{} classes, {} counts", grouping.classes.len(), grouping.counts.len()),
            reason: "one count per class required".into(),
        });
    }

    let n = samples.nrows();
    let total: usize = grouping.counts.iter().sum();
    if total != n {
        return Err(Error::SizeMismatch { expected: n, actual: total });
    }
    if grouping.order.len() != n {
        return Err(Error::SizeMismatch {
            expected: n,
            actual: grouping.order.len(),
        });
    }
    if let Some(&bad) = grouping.order.iter().find(|&&i| i >= n) {
        return Err(Error::InvalidParameter {
            name: "grouping",
            value: bad.to_string(),
            reason: format!("sample index past the last row ({})", n),
        });
    }

    let mut train_rows = Vec::new();
    let mut test_rows = Vec::new();
    let mut y_train = Vec::new();
    let mut y_test = Vec::new();
    let mut summary = SplitSummary::default();

    let mut start = 0;
    for (&class, &count) in grouping.classes.iter().zip(&grouping.counts) {
        let n_train = (count as f64 * train_fraction).floor() as usize;
        let block = &grouping.order[start..start + count];

        train_rows.extend_from_slice(&block[..n_train]);
        test_rows.extend_from_slice(&block[n_train..]);
        y_train.extend(std::iter::repeat(class).take(n_train));
        y_test.extend(std::iter::repeat(class).take(count - n_train));

        summary.classes.push(ClassSplitCount {
            class,
            train: n_train,
            test: count - n_train,
            total: count,
        });
        start += count;
    }

    debug!(
        train = train_rows.len(),
        test = test_rows.len(),
        "stratified split\n{}",
        summary
    );

    Ok(DatasetSplit {
        x_train: select_rows(samples, &train_rows),
        x_test: select_rows(samples, &test_rows),
        y_train,
        y_test,
        summary,
    })
}

/// Shuffle, group by class and split in one call.
pub fn stratified_split<R: Rng + ?Sized>(
    samples: ArrayView2<'_, f64>,
    labels: &[ClassId],
    params: SplitParams,
    rng: &mut R,
) -> Result<DatasetSplit> {
    let shuffled = shuffle(samples, labels, rng)?;
    let grouping = group_by_class(&shuffled.labels);
    split(shuffled.samples.view(), &grouping, params.train_fraction)
}
