//! Direct LU factorization without pivoting
//!
//! - [`getrf_nopivot`]: in-place factorization of a strided row-major buffer
//! - [`lu_nopivot`]: factorization of an owned `ndarray` matrix, with solve

mod getrf;
mod lu;

pub use getrf::{LuReport, getrf_nopivot, getrf_nopivot_with};
pub use lu::{LuFactorization, lu_nopivot, lu_solve};
