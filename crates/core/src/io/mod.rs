//! I/O operations for reading and writing class grids

mod native;

pub use native::{read_grid, read_grid_from_buffer, write_grid, write_grid_to_buffer};
