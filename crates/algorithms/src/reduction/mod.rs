//! Dimensionality reduction of sample matrices
//!
//! The evaluation pipeline only needs two capabilities from a reducer:
//! picking a number of components for a target retained variance, and
//! projecting samples onto that many components. [`Pca`] provides both.

mod pca;

pub use pca::{Pca, PcaModel};

use hypereval_core::{Result, SampleMatrix};
use ndarray::ArrayView2;

/// Parameters for choosing the number of components
#[derive(Debug, Clone, Copy)]
pub struct ReductionParams {
    /// Cumulative explained-variance ratio to stay within (default: 0.9991)
    pub variance_threshold: f64,
}

impl Default for ReductionParams {
    fn default() -> Self {
        Self {
            variance_threshold: 0.9991,
        }
    }
}

/// Reduces the feature dimension of a sample matrix
pub trait DimensionReducer {
    /// Number of leading components whose cumulative explained-variance
    /// ratio does not exceed `threshold`
    fn choose_n_components(&self, samples: ArrayView2<'_, f64>, threshold: f64) -> Result<usize>;

    /// Project samples onto the first `n_components` components
    fn reduce(&self, samples: ArrayView2<'_, f64>, n_components: usize) -> Result<SampleMatrix>;
}
