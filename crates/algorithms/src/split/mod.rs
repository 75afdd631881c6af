//! Stratified train/test splitting
//!
//! Samples are shuffled, grouped by class, and each class is split into a
//! train and a test part of proportional size.

mod shuffle;
mod stratified;

pub use shuffle::{shuffle, shuffle_with, Shuffled};
pub use stratified::{
    group_by_class, split, stratified_split, ClassGrouping, ClassSplitCount, DatasetSplit,
    SplitSummary,
};

/// Parameters for stratified splitting
#[derive(Debug, Clone, Copy)]
pub struct SplitParams {
    /// Fraction of each class assigned to train (default: 0.75)
    pub train_fraction: f64,
    /// Seed for the shuffle when the caller does not supply a generator
    pub seed: u64,
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            train_fraction: 0.75,
            seed: 42,
        }
    }
}
