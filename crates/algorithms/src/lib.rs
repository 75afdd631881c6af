//! # HyperEval Algorithms
//!
//! Evaluation steps for clustering and classification of hyperspectral
//! scenes.
//!
//! ## Modules
//!
//! - **masking**: Unclassified-pixel masking, outlier exclusion and reconstruction
//! - **correspondence**: Rank-based alignment of class and cluster ids
//! - **split**: Seeded shuffle and per-class train/test split
//! - **scoring**: Unweighted per-class mean score
//! - **reduction**: PCA and component selection by retained variance

pub mod correspondence;
pub mod masking;
pub mod reduction;
pub mod scoring;
pub mod split;

mod maybe_rayon;
mod report;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::correspondence::{
        distinct_count, resolve_correspondence, ClassCounts, Correspondence,
    };
    pub use crate::masking::{
        exclude_outliers, exclude_outliers_grid, isolate_class, mask_input, mask_predictions,
        reconstruct, unmask, UNCLASSIFIED,
    };
    pub use crate::reduction::{DimensionReducer, Pca, PcaModel, ReductionParams};
    pub use crate::scoring::{mean_score, AgreementScorer, ClassScore, ScoreReport, Scorer};
    pub use crate::split::{
        group_by_class, shuffle, shuffle_with, split, stratified_split, ClassGrouping,
        ClassSplitCount, DatasetSplit, SplitParams, SplitSummary, Shuffled,
    };
    pub use hypereval_core::prelude::*;
}
