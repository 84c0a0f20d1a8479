//! Foundational primitives for label pyramids.
//!
//! ## Grids
//! A [`Grid`] is a dense, owned, row-major buffer of `u8` labels with one to
//! three axes. Axes are ordered `[rows, cols, depth]` and the last populated
//! axis is the fastest-varying one. Unused axes are stored with extent 1, so
//! every grid can be addressed with a three-component coordinate.
//!
//! ## Histograms and Mode
//! Labels live in the bounded domain `0..=255`. A [`Histogram`] holds exactly
//! 256 bins. The mode of a histogram is the smallest label with the highest
//! count, which is what an ascending scan keeping the first maximum yields.

mod dims;
mod error;
mod grid;
mod histogram;

pub use dims::{Dims, MAX_AXES};
pub use error::Error;
pub use grid::Grid;
pub use histogram::{BINS, Histogram};
