//! Lockstep shuffling of samples and labels

use hypereval_core::{select_rows, ClassId, SampleMatrix};
use hypereval_core::{Error, Result};
use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand::Rng;

/// Samples and labels reordered by the same permutation
#[derive(Debug, Clone)]
pub struct Shuffled {
    pub samples: SampleMatrix,
    pub labels: Vec<ClassId>,
    /// `samples[k]` is the input row `permutation[k]`
    pub permutation: Vec<usize>,
}

/// Shuffle samples and labels with one uniformly random permutation.
///
/// # Errors
/// [`Error::SizeMismatch`] if `labels` does not have one entry per sample row
pub fn shuffle<R: Rng + ?Sized>(
    samples: ArrayView2<'_, f64>,
    labels: &[ClassId],
    rng: &mut R,
) -> Result<Shuffled> {
    let mut permutation: Vec<usize> = (0..labels.len()).collect();
    permutation.shuffle(rng);
    shuffle_with(samples, labels, permutation)
}

/// Reorder samples and labels by a given permutation.
///
/// # Errors
/// - [`Error::SizeMismatch`] if lengths disagree
/// - [`Error::InvalidParameter`] if `permutation` is not a permutation of `0..n`
pub fn shuffle_with(
    samples: ArrayView2<'_, f64>,
    labels: &[ClassId],
    permutation: Vec<usize>,
) -> Result<Shuffled> {
    if samples.nrows() != labels.len() {
        return Err(Error::SizeMismatch {
            expected: samples.nrows(),
            actual: labels.len(),
        });
    }
    if permutation.len() != labels.len() {
        return Err(Error::SizeMismatch {
            expected: labels.len(),
            actual: permutation.len(),
        });
    }

    let mut seen = vec![false; permutation.len()];
    for &p in &permutation {
        match seen.get_mut(p) {
            Some(slot) if !*slot => *slot = true,
            _ => {
                return Err(Error::InvalidParameter {
                    name: "permutation",
                    value: p.to_string(),
                    reason: "index repeated or out of range".into(),
                })
            }
        }
    }

    Ok(Shuffled {
        samples: select_rows(samples, &permutation),
        labels: permutation.iter().map(|&p| labels[p]).collect(),
        permutation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn samples() -> SampleMatrix {
        Array2::from_shape_fn((5, 2), |(k, b)| (k * 10 + b) as f64)
    }

    #[test]
    fn test_shuffle_with_fixed_permutation() {
        let labels = [1, 2, 3, 4, 5];
        let shuffled = shuffle_with(samples().view(), &labels, vec![4, 0, 3, 1, 2]).unwrap();

        assert_eq!(shuffled.labels, vec![5, 1, 4, 2, 3]);
        assert_eq!(shuffled.samples.row(0).to_vec(), vec![40.0, 41.0]);
        assert_eq!(shuffled.samples.row(2).to_vec(), vec![30.0, 31.0]);
    }

    #[test]
    fn test_shuffle_keeps_rows_and_labels_together() {
        let labels = [10, 11, 12, 13, 14];
        let mut rng = StdRng::seed_from_u64(3);
        let shuffled = shuffle(samples().view(), &labels, &mut rng).unwrap();

        let mut sorted = shuffled.permutation.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);

        for (k, &p) in shuffled.permutation.iter().enumerate() {
            assert_eq!(shuffled.labels[k], labels[p]);
            assert_eq!(shuffled.samples[[k, 0]], (p * 10) as f64);
        }
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let labels = [1, 1, 2, 2, 3];
        let a = shuffle(samples().view(), &labels, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = shuffle(samples().view(), &labels, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a.permutation, b.permutation);
    }

    #[test]
    fn test_invalid_permutation() {
        let labels = [1, 2, 3, 4, 5];
        assert!(shuffle_with(samples().view(), &labels, vec![0, 0, 1, 2, 3]).is_err());
        assert!(shuffle_with(samples().view(), &labels, vec![0, 1, 2, 3, 9]).is_err());
        assert!(shuffle_with(samples().view(), &labels, vec![0, 1]).is_err());
        assert!(shuffle_with(samples().view(), &labels[..3], vec![0, 1, 2]).is_err());
    }
}
