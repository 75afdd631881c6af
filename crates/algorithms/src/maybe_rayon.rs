//! Parallel iteration when the `parallel` feature is on, plain iteration
//! otherwise.
//!
//! Algorithms import `crate::maybe_rayon::*` and call `into_par_iter()`;
//! without rayon the call resolves to `into_iter()` and the rest of the
//! chain uses the standard `Iterator` adapters.
#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::IntoParallelIterator`
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
