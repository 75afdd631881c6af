//! Distinct values, populations and population ranks of a class grid

use std::collections::BTreeMap;

use hypereval_core::{ClassId, Grid};

/// Distinct values of a class grid with their populations.
///
/// Values are in ascending order. `rank()` lists the positions of `values()`
/// by ascending population; ties keep ascending value order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCounts {
    values: Vec<ClassId>,
    counts: Vec<usize>,
    rank: Vec<usize>,
}

impl ClassCounts {
    pub fn from_grid(grid: &Grid<ClassId>) -> Self {
        Self::from_values(grid.iter())
    }

    pub fn from_values<I: IntoIterator<Item = ClassId>>(values: I) -> Self {
        let mut histogram: BTreeMap<ClassId, usize> = BTreeMap::new();
        for v in values {
            *histogram.entry(v).or_default() += 1;
        }

        let (values, counts): (Vec<ClassId>, Vec<usize>) = histogram.into_iter().unzip();

        // sort_by_key is stable
        let mut rank: Vec<usize> = (0..counts.len()).collect();
        rank.sort_by_key(|&i| counts[i]);

        Self { values, counts, rank }
    }

    /// Distinct values, ascending
    pub fn values(&self) -> &[ClassId] {
        &self.values
    }

    /// Population of each entry of `values()`
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Indices into `values()` ordered by ascending population
    pub fn rank(&self) -> &[usize] {
        &self.rank
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: ClassId) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    /// Population of `value`, zero if absent
    pub fn count_of(&self, value: ClassId) -> usize {
        self.values
            .binary_search(&value)
            .map(|i| self.counts[i])
            .unwrap_or(0)
    }

    /// `(value, population)` pairs from least to most populated
    pub fn by_rank(&self) -> impl Iterator<Item = (ClassId, usize)> + '_ {
        self.rank.iter().map(|&i| (self.values[i], self.counts[i]))
    }

    /// `(value, population)` pairs in ascending value order
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, usize)> + '_ {
        self.values.iter().copied().zip(self.counts.iter().copied())
    }
}

/// Number of distinct values in a class grid, the `n_cluster` the
/// correspondence expects for it
pub fn distinct_count(grid: &Grid<ClassId>) -> usize {
    ClassCounts::from_grid(grid).len()
}
