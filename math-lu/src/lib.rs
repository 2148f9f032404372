//! Dense LU decomposition without pivoting, distributed over computation lanes
//!
//! Factorizes an m x n matrix as A = L U, with L unit lower triangular and U
//! upper triangular, overwriting A with both factors. Rows are spread over a
//! configurable number of lanes in a row-cyclic layout; each elimination
//! step extracts the pivot row, scales the column below it and applies a
//! rank-1 update to the trailing submatrix with every lane working on its
//! own rows.
//!
//! # Features
//!
//! - **In-place buffer API**: [`getrf_nopivot`] on a strided row-major slice
//! - **Owned-matrix API**: [`lu_nopivot`] returning an [`LuFactorization`]
//!   with factor extraction, reconstruction and solves
//! - **Lane parallelism**: rayon across lanes (feature `rayon`), with a
//!   sequential fallback giving identical results
//! - **Singular pivot policies**: ignore, report through `info`, or fail fast
//! - **Generic Scalar Types**: Works with f64, f32, Complex64, Complex32
//!
//! No row exchanges are performed. Matrices with a zero leading principal
//! minor produce a singular pivot, which is reported according to
//! [`SingularPolicy`] but never repaired.
//!
//! # Example
//!
//! ```
//! use math_audio_lu::{LuConfig, lu_nopivot};
//! use ndarray::array;
//!
//! let a = array![[4.0_f64, 3.0], [6.0, 3.0]];
//! let lu = lu_nopivot(&a, &LuConfig::with_lanes(2)).unwrap();
//!
//! assert_eq!(lu.lower(), array![[1.0, 0.0], [1.5, 1.0]]);
//! assert_eq!(lu.upper(), array![[4.0, 3.0], [0.0, -1.5]]);
//! assert_eq!(lu.reconstruct(), a);
//! ```

pub mod buffer;
pub mod config;
pub mod direct;
pub mod distribution;
pub mod elimination;
pub mod error;
pub mod parallel;
pub mod traits;

// Re-export main types
pub use buffer::{LaneBuffer, MatrixLayout};
pub use config::{LuConfig, SingularPolicy};
pub use distribution::{CyclicDistribution, RowDistribution};
pub use error::{LuError, Result};
pub use traits::ComplexField;

// Re-export the elimination stages
pub use elimination::{PivotRow, SweepController, SweepState, SweepStats};

// Re-export direct solvers
pub use direct::{
    LuFactorization, LuReport, getrf_nopivot, getrf_nopivot_with, lu_nopivot, lu_solve,
};
