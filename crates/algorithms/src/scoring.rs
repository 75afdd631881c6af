//! Per-class score aggregation
//!
//! Scores each class on its own subset of samples and averages the results
//! without weighting by class size, so small classes count as much as
//! large ones.

use std::fmt;

use hypereval_core::{select_rows, ClassId};
use hypereval_core::{Error, Result};
use ndarray::ArrayView2;
use serde::Serialize;
use tracing::debug;

use crate::report::write_table;

/// Anything that can score a labelled sample subset, e.g. a trained
/// classifier's accuracy.
pub trait Scorer {
    fn score(&self, x: ArrayView2<'_, f64>, y: &[ClassId]) -> Result<f64>;
}

impl<F> Scorer for F
where
    F: Fn(ArrayView2<'_, f64>, &[ClassId]) -> Result<f64>,
{
    fn score(&self, x: ArrayView2<'_, f64>, y: &[ClassId]) -> Result<f64> {
        self(x, y)
    }
}

/// Score of one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassScore {
    pub class: ClassId,
    pub n_samples: usize,
    pub score: f64,
}

/// Per-class scores and their unweighted mean
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub classes: Vec<ClassScore>,
    pub mean: f64,
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Vec<String>> = self
            .classes
            .iter()
            .map(|c| {
                vec![
                    c.class.to_string(),
                    c.n_samples.to_string(),
                    format!("{:.4}", c.score),
                ]
            })
            .collect();
        write_table(f, &["Class", "Nb samples", "Score"], &rows)?;
        writeln!(f, "Mean score: {:.4}", self.mean)
    }
}

/// Score every class separately and average the scores.
///
/// For each id in `class_ids`, the rows of `x` whose `y` equals that id are
/// handed to `scorer`. A class without samples is still passed on (as an
/// empty subset); the scorer decides whether that is an error.
///
/// # Errors
/// - [`Error::InvalidParameter`] if `class_ids` is empty
/// - [`Error::SizeMismatch`] if `y` does not have one entry per row of `x`
/// - any error returned by `scorer`
pub fn mean_score<S: Scorer + ?Sized>(
    class_ids: &[ClassId],
    x: ArrayView2<'_, f64>,
    y: &[ClassId],
    scorer: &S,
) -> Result<ScoreReport> {
    if class_ids.is_empty() {
        return Err(Error::InvalidParameter {
            name: "class_ids",
            value: "[]".into(),
            reason: "the mean over zero classes is undefined".into(),
        });
    }
    if x.nrows() != y.len() {
        return Err(Error::SizeMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }

    let mut classes = Vec::with_capacity(class_ids.len());
    for &class in class_ids {
        let rows: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();
        let subset = select_rows(x, &rows);
        let y_subset = vec![class; rows.len()];

        let score = scorer.score(subset.view(), &y_subset)?;
        classes.push(ClassScore {
            class,
            n_samples: rows.len(),
            score,
        });
    }

    let mean = classes.iter().map(|c| c.score).sum::<f64>() / classes.len() as f64;
    let report = ScoreReport { classes, mean };
    debug!("per-class scores\n{}", report);
    Ok(report)
}

/// Scorer reading column 0 of each sample as a predicted class id.
///
/// Returns the fraction of samples whose prediction equals `y`. An empty
/// subset is an [`Error::InvalidParameter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AgreementScorer;

impl Scorer for AgreementScorer {
    fn score(&self, x: ArrayView2<'_, f64>, y: &[ClassId]) -> Result<f64> {
        if y.is_empty() {
            return Err(Error::InvalidParameter {
                name: "y",
                value: "[]".into(),
                reason: "agreement of an empty class is undefined".into(),
            });
        }
        if x.ncols() == 0 {
            return Err(Error::InvalidParameter {
                name: "x",
                value: format!("{:?}", x.dim()),
                reason: "predictions expected in column 0".into(),
            });
        }
        let hits = x
            .column(0)
            .iter()
            .zip(y)
            .filter(|&(&pred, &label)| pred == label as f64)
            .count();
        Ok(hits as f64 / y.len() as f64)
    }
}
