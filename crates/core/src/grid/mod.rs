//! Grid data structures and position bookkeeping

mod element;
mod grid;
mod index;

pub use element::GridElement;
pub use grid::Grid;
pub use index::{GridIndex, GridPos};

/// Integer id of a ground-truth class or a predicted cluster.
///
/// `0` is reserved for unclassified pixels once a grid has been masked or
/// aligned.
pub type ClassId = u32;

/// Ground-truth class grid (`0` = unclassified)
pub type LabeledGrid = Grid<ClassId>;

/// Cluster ids produced by an external clustering step
pub type PredictionGrid = Grid<ClassId>;
