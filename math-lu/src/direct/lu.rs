//! LU factorization of owned matrices
//!
//! Wraps the lane sweep for callers holding an `ndarray` matrix, and provides
//! factor extraction, reconstruction and triangular solves on the result.
//! No row exchanges are performed, so the leading principal minors of the
//! input must be nonzero for the factors to be meaningful.

use super::getrf::{LuReport, factorize_buffer};
use crate::buffer::{LaneBuffer, MatrixLayout};
use crate::config::LuConfig;
use crate::distribution::CyclicDistribution;
use crate::error::{LuError, Result};
use crate::traits::ComplexField;
use ndarray::{Array1, Array2};
use num_traits::{FromPrimitive, ToPrimitive, Zero};

/// LU factorization result
///
/// Stores L and U in a single matrix: U on and above the diagonal, the
/// multipliers of the unit lower triangular L strictly below it.
#[derive(Debug, Clone)]
pub struct LuFactorization<T: ComplexField> {
    /// Combined L and U matrices (L is unit lower triangular, stored below diagonal)
    pub lu: Array2<T>,
    /// Sweep report, including the `info` status
    pub report: LuReport,
    /// Pivot tolerance the factorization ran with
    tolerance: T::Real,
}

impl<T: ComplexField> LuFactorization<T> {
    /// Number of rows of the factorized matrix
    pub fn nrows(&self) -> usize {
        self.lu.nrows()
    }

    /// Number of columns of the factorized matrix
    pub fn ncols(&self) -> usize {
        self.lu.ncols()
    }

    /// Unit lower triangular factor, `m x min(m, n)`
    pub fn lower(&self) -> Array2<T> {
        let (m, n) = self.lu.dim();
        let k = m.min(n);
        Array2::from_shape_fn((m, k), |(i, j)| {
            if i == j {
                T::one()
            } else if i > j {
                self.lu[[i, j]]
            } else {
                T::zero()
            }
        })
    }

    /// Upper triangular factor, `min(m, n) x n`
    pub fn upper(&self) -> Array2<T> {
        let (m, n) = self.lu.dim();
        let k = m.min(n);
        Array2::from_shape_fn((k, n), |(i, j)| {
            if j >= i { self.lu[[i, j]] } else { T::zero() }
        })
    }

    /// Multiply the factors back together: L * U
    pub fn reconstruct(&self) -> Array2<T> {
        let lower = self.lower();
        let upper = self.upper();
        let (m, k) = lower.dim();
        let n = upper.ncols();
        Array2::from_shape_fn((m, n), |(i, j)| {
            let mut sum = T::zero();
            for p in 0..k.min(i + 1).min(j + 1) {
                sum += lower[[i, p]] * upper[[p, j]];
            }
            sum
        })
    }

    /// Determinant of a square matrix: product of U's diagonal
    pub fn determinant(&self) -> Result<T> {
        self.require_square()?;
        Ok(self.lu.diag().iter().fold(T::one(), |acc, &d| acc * d))
    }

    /// Magnitude at or below which a diagonal entry of U counts as singular
    pub fn pivot_tolerance(&self) -> T::Real {
        self.tolerance
    }

    /// Solve Ax = b using the pre-computed factorization
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>> {
        let n = self.require_square()?;
        if b.len() != n {
            return Err(LuError::DimensionMismatch {
                expected: n,
                got: b.len(),
            });
        }

        let mut x = b.clone();

        // Forward substitution: Ly = b
        for i in 0..n {
            for j in 0..i {
                let l_ij = self.lu[[i, j]];
                x[i] = x[i] - l_ij * x[j];
            }
        }

        // Backward substitution: Ux = y
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let u_ij = self.lu[[i, j]];
                x[i] = x[i] - u_ij * x[j];
            }
            let u_ii = self.lu[[i, i]];
            if u_ii.is_singular_pivot(self.tolerance) {
                return Err(LuError::SingularPivot {
                    step: i,
                    magnitude: u_ii.norm().to_f64().unwrap_or(f64::NAN),
                });
            }
            x[i] *= u_ii.inv();
        }

        Ok(x)
    }

    fn require_square(&self) -> Result<usize> {
        let (m, n) = self.lu.dim();
        if m != n {
            return Err(LuError::NotSquare { rows: m, cols: n });
        }
        Ok(n)
    }
}

/// Compute the LU factorization without pivoting of `a`
///
/// The input is copied into lane storage according to `config.lanes` and
/// eliminated there; `a` itself is not modified.
pub fn lu_nopivot<T: ComplexField>(a: &Array2<T>, config: &LuConfig) -> Result<LuFactorization<T>> {
    config.validate()?;
    let (m, n) = a.dim();
    let layout = MatrixLayout::new(m, n, n)?;
    layout.check_limits(config)?;

    let distribution = CyclicDistribution::new(config.lanes)?;
    let mut buffer = LaneBuffer::from_array(&a.view(), distribution);
    let stats = factorize_buffer(&mut buffer, config)?;

    Ok(LuFactorization {
        lu: buffer.to_array(),
        report: LuReport {
            rows: m,
            cols: n,
            lanes: config.lanes,
            stats,
        },
        tolerance: T::Real::from_f64(config.pivot_tolerance).unwrap_or_else(T::Real::zero),
    })
}

/// Solve Ax = b using LU decomposition without pivoting
///
/// This is a convenience function that combines factorization and solve.
pub fn lu_solve<T: ComplexField>(
    a: &Array2<T>,
    b: &Array1<T>,
    config: &LuConfig,
) -> Result<Array1<T>> {
    let factorization = lu_nopivot(a, config)?;
    factorization.solve(b)
}
