//! Element trait for generic grid cell values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a grid cell.
///
/// Covers the integer class ids used by label and prediction grids as well
/// as the floating point values carried by feature bands.
pub trait GridElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
}

macro_rules! impl_grid_element {
    ($($t:ty),*) => {
        $(impl GridElement for $t {})*
    };
}

impl_grid_element!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);
