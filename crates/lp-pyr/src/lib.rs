//! Mode-preserving pyramids for label grids.
//!
//! `lp-pyr` halves every populated axis per level and writes, for each
//! destination cell, the statistical mode of the source block it replaces.
//! Labels are never averaged, so each coarse cell keeps a label that actually
//! dominates its region.
//!
//! Drop-odd policy:
//! - A level's extent along an axis is `source / 2`, clamped to 1.
//! - If a source extent is odd, its trailing cells are not covered.
//! - An axis that already has extent 1 is not halved; its blocks have span 1.
//!
//! Execution model:
//! - Every level's blocks are enumerated in destination row-major order and
//!   split into `min(workers, blocks)` contiguous queues, the remainder going
//!   to the last queue.
//! - Each queue runs on its own scoped thread and owns a disjoint slice of the
//!   destination buffers, so workers never share mutable state.
//! - [`ModePyramid::downsample`] returns only after every worker has joined.

mod block;
mod config;
mod partition;
mod pyramid;
mod worker;

pub use block::{BlockDescriptor, LevelPlan, plan_levels};
pub use config::{DEFAULT_WORKERS, DownsampleConfig, Reduction};
pub use partition::WorkPartition;
pub use pyramid::ModePyramid;
pub use worker::execute;
