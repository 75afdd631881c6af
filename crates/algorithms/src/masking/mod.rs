//! Index-preserving masked transforms
//!
//! Removing pixels from a scene before clustering and putting them back
//! afterwards:
//! - **Unclassified masking**: pixels whose ground-truth label is `0`
//! - **Outlier exclusion**: pixels flagged by an external anomaly detector
//!
//! Every removal returns the original position of each retained sample so
//! that the full-size grid can be rebuilt.

mod outliers;
mod unclassified;

pub use outliers::{exclude_outliers, exclude_outliers_grid, reconstruct};
pub use unclassified::{isolate_class, mask_input, mask_predictions, unmask, UNCLASSIFIED};
