//! Label/cluster correspondence
//!
//! Clustering algorithms number their clusters arbitrarily. To compare a
//! clustering with ground truth, both the true classes and the predicted
//! clusters are renumbered onto a shared canonical space `1..=n_cluster`
//! (`0` stays unclassified), pairing classes and clusters of the same
//! population rank: the least populated class with the least populated
//! cluster, and so on.
//!
//! This is a rank heuristic, not an optimal assignment. It works when the
//! classes of a scene have clearly different sizes, which is typical of
//! hyperspectral benchmark scenes.

mod counts;
mod resolve;

pub use counts::{distinct_count, ClassCounts};
pub use resolve::{resolve_correspondence, Correspondence};
