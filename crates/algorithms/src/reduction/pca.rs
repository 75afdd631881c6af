//! Principal Component Analysis of a sample matrix
//!
//! Builds the covariance matrix of the feature columns, then extracts
//! eigenvalues and eigenvectors with cyclic Jacobi rotations.

use hypereval_core::{Error, Result, SampleMatrix};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use tracing::debug;

use super::DimensionReducer;
use crate::maybe_rayon::*;

/// Stateless PCA reducer: every call fits a fresh [`PcaModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Pca;

impl DimensionReducer for Pca {
    fn choose_n_components(&self, samples: ArrayView2<'_, f64>, threshold: f64) -> Result<usize> {
        validate_threshold(threshold)?;
        let model = PcaModel::fit(samples)?;
        model.components_within(threshold)
    }

    fn reduce(&self, samples: ArrayView2<'_, f64>, n_components: usize) -> Result<SampleMatrix> {
        PcaModel::fit(samples)?.transform(samples, n_components)
    }
}

/// Fitted principal axes of a sample matrix
#[derive(Debug, Clone)]
pub struct PcaModel {
    means: Array1<f64>,
    /// Column `k` is the `k`-th principal axis
    components: Array2<f64>,
    /// Variance along each axis, descending
    eigenvalues: Vec<f64>,
}

impl PcaModel {
    /// Fit principal axes to `samples` (one row per pixel).
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if `samples` has no rows or no columns,
    /// or holds a non-finite value.
    pub fn fit(samples: ArrayView2<'_, f64>) -> Result<Self> {
        let (n_samples, n_features) = samples.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(Error::InvalidParameter {
                name: "samples",
                value: format!("{:?}", samples.dim()),
                reason: "PCA requires at least one sample and one feature".into(),
            });
        }
        if let Some(v) = samples.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "samples",
                value: v.to_string(),
                reason: "PCA requires finite values".into(),
            });
        }

        let means = samples
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::Other("mean of an empty axis".into()))?;
        let centred = &samples - &means;
        let denom = (n_samples - 1).max(1) as f64;
        let cov = centred.t().dot(&centred) / denom;

        let (values, vectors) = jacobi_eigen(cov);

        let mut order: Vec<usize> = (0..n_features).collect();
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

        let mut components = Array2::zeros((n_features, n_features));
        for (k, &src) in order.iter().enumerate() {
            let mut axis = vectors.column(src).to_owned();
            // Largest loading positive, so the sign of each axis is reproducible
            let pivot = axis
                .iter()
                .copied()
                .fold(0.0_f64, |best, v| if v.abs() > best.abs() { v } else { best });
            if pivot < 0.0 {
                axis.mapv_inplace(|v| -v);
            }
            components.column_mut(k).assign(&axis);
        }
        let eigenvalues: Vec<f64> = order.iter().map(|&i| values[i].max(0.0)).collect();

        debug!(n_samples, n_features, ?eigenvalues, "fitted PCA");

        Ok(Self {
            means,
            components,
            eigenvalues,
        })
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Share of the total variance carried by each axis
    pub fn explained_variance_ratio(&self) -> Vec<f64> {
        let total: f64 = self.eigenvalues.iter().sum();
        self.eigenvalues
            .iter()
            .map(|ev| if total > 0.0 { ev / total } else { 0.0 })
            .collect()
    }

    /// Number of leading axes whose cumulative explained-variance ratio is
    /// `<= threshold`. May be `0` when the first axis alone exceeds it.
    pub fn components_within(&self, threshold: f64) -> Result<usize> {
        validate_threshold(threshold)?;
        let mut cumulative = 0.0;
        let count = self
            .explained_variance_ratio()
            .into_iter()
            .take_while(|ratio| {
                cumulative += ratio;
                cumulative <= threshold
            })
            .count();
        Ok(count)
    }

    /// Project centred samples onto the first `n_components` axes.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] if `n_components` is `0` or exceeds
    ///   the number of features
    /// - [`Error::SizeMismatch`] if `samples` does not have the fitted
    ///   feature width
    pub fn transform(&self, samples: ArrayView2<'_, f64>, n_components: usize) -> Result<SampleMatrix> {
        let n_features = self.n_features();
        if n_components == 0 || n_components > n_features {
            return Err(Error::InvalidParameter {
                name: "n_components",
                value: n_components.to_string(),
                reason: format!("must lie in 1..={}", n_features),
            });
        }
        if samples.ncols() != n_features {
            return Err(Error::SizeMismatch {
                expected: n_features,
                actual: samples.ncols(),
            });
        }

        let axes = self.components.slice(ndarray::s![.., ..n_components]);
        let means = &self.means;
        let rows: Vec<Vec<f64>> = (0..samples.nrows())
            .into_par_iter()
            .map(|k| {
                let centred = &samples.row(k) - means;
                centred.dot(&axes).to_vec()
            })
            .collect();

        let data: Vec<f64> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((samples.nrows(), n_components), data)
            .map_err(|e| Error::Other(e.to_string()))
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "threshold",
            value: threshold.to_string(),
            reason: "must lie in (0, 1]".into(),
        })
    }
}

/// Eigen decomposition of a symmetric matrix.
///
/// Returns the eigenvalues (unsorted) and a matrix whose column `i` is the
/// eigenvector of eigenvalue `i`.
fn jacobi_eigen(mut a: Array2<f64>) -> (Vec<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut v = Array2::eye(n);
    let max_sweeps = 100 * n * n;
    let eps = 1e-12;

    for _ in 0..max_sweeps {
        // Largest off-diagonal element
        let mut max_val = 0.0;
        let (mut p, mut q) = (0, 0);
        for i in 0..n {
            for j in (i + 1)..n {
                if a[[i, j]].abs() > max_val {
                    max_val = a[[i, j]].abs();
                    p = i;
                    q = j;
                }
            }
        }
        if max_val < eps {
            break;
        }

        let (app, aqq, apq) = (a[[p, p]], a[[q, q]], a[[p, q]]);
        let theta = if (app - aqq).abs() < eps {
            std::f64::consts::FRAC_PI_4
        } else {
            0.5 * (2.0 * apq / (app - aqq)).atan()
        };
        let (sin_t, cos_t) = theta.sin_cos();

        for i in 0..n {
            if i != p && i != q {
                let (aip, aiq) = (a[[i, p]], a[[i, q]]);
                a[[i, p]] = cos_t * aip + sin_t * aiq;
                a[[p, i]] = a[[i, p]];
                a[[i, q]] = -sin_t * aip + cos_t * aiq;
                a[[q, i]] = a[[i, q]];
            }
        }
        a[[p, p]] = cos_t * cos_t * app + 2.0 * sin_t * cos_t * apq + sin_t * sin_t * aqq;
        a[[q, q]] = sin_t * sin_t * app - 2.0 * sin_t * cos_t * apq + cos_t * cos_t * aqq;
        a[[p, q]] = 0.0;
        a[[q, p]] = 0.0;

        for i in 0..n {
            let (vip, viq) = (v[[i, p]], v[[i, q]]);
            v[[i, p]] = cos_t * vip + sin_t * viq;
            v[[i, q]] = -sin_t * vip + cos_t * viq;
        }
    }

    ((0..n).map(|i| a[[i, i]]).collect(), v)
}
