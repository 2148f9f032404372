//! Right-looking elimination over lane storage
//!
//! One elimination step `s` runs three stages in order:
//! - [`PivotRow::extract`]: copy row `s` from column `s` onward
//! - [`divide`]: turn column `s` below the diagonal into L multipliers
//! - [`update`]: rank-1 update of the trailing submatrix, one lane per worker
//!
//! [`SweepController`] sequences the steps. Stages of one step are separated
//! by barriers; steps never overlap.

mod divide;
mod pivot;
mod sweep;
mod update;

pub use divide::{divide, divide_lane};
pub use pivot::PivotRow;
pub use sweep::{SweepController, SweepState, SweepStats, elimination_steps};
pub use update::{update, update_lane};
