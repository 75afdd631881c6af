//! # HyperEval Core
//!
//! Core types and I/O for evaluating pixel clustering of hyperspectral
//! scenes against ground truth.
//!
//! This crate provides:
//! - `Grid<T>`: Generic 2D grid type, used for label and prediction grids
//! - `GridIndex`: Conversion between grid positions and row-major sample order
//! - Sample containers (`SampleMatrix`, `FlatIndex`, `PositionIndex`, `OutlierSet`)
//! - TIFF I/O for class grids

pub mod error;
pub mod grid;
pub mod io;
pub mod samples;

pub use error::{Error, Result};
pub use grid::{ClassId, Grid, GridElement, GridIndex, GridPos, LabeledGrid, PredictionGrid};
pub use samples::{cube_to_samples, select_rows, FlatIndex, OutlierSet, PositionIndex, SampleMatrix};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{ClassId, Grid, GridElement, GridIndex, GridPos, LabeledGrid, PredictionGrid};
    pub use crate::samples::{FlatIndex, OutlierSet, PositionIndex, SampleMatrix};
}
