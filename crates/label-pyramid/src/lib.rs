//! Umbrella crate for the `label-pyramid` workspace.
//!
//! Re-exports the grid primitives from `lp-core` and the downsampling engine
//! from `lp-pyr`.

pub use lp_core::*;
pub use lp_pyr::*;
