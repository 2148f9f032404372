//! In-place LU factorization of a strided row-major buffer
//!
//! [`getrf_nopivot`] is the buffer-level entry point: it validates the shape
//! once, loads the matrix into lane storage, runs the elimination sweep and
//! writes the combined factors back over the input.

use crate::buffer::{LaneBuffer, MatrixLayout};
use crate::config::LuConfig;
use crate::distribution::{CyclicDistribution, RowDistribution};
use crate::elimination::{SweepController, SweepStats};
use crate::error::Result;
use crate::parallel::{is_parallel_available, run_in_pool};
use crate::traits::ComplexField;

/// Outcome of a factorization that ran to completion
#[derive(Debug, Clone, PartialEq)]
pub struct LuReport {
    /// Row count (m)
    pub rows: usize,
    /// Column count (n)
    pub cols: usize,
    /// Lanes the rows were distributed over
    pub lanes: usize,
    /// Sweep statistics
    pub stats: SweepStats,
}

impl LuReport {
    /// LAPACK-style status: 0 on success, `i + 1` if U's diagonal entry `i` is
    /// singular. Only the first such entry is reported.
    ///
    /// Always 0 under [`SingularPolicy::Ignore`](crate::SingularPolicy::Ignore).
    pub fn info(&self) -> i32 {
        match self.stats.first_singular_step {
            Some(step) => i32::try_from(step + 1).unwrap_or(i32::MAX),
            None => 0,
        }
    }

    /// True when no singular pivot was recorded
    pub fn is_success(&self) -> bool {
        self.stats.first_singular_step.is_none()
    }
}

/// Factorize the `m x n` matrix stored row-major in `a` with row stride `lda`.
///
/// On return `a` holds U on and above the diagonal and the multipliers of L
/// strictly below it; L's unit diagonal is not stored. Elements between
/// column `n` and `lda` are not touched. When the sweep fails (strict
/// singular policy) `a` is left unmodified.
///
/// # Example
///
/// ```
/// use math_audio_lu::{LuConfig, getrf_nopivot};
///
/// let mut a = vec![4.0_f64, 3.0, 6.0, 3.0];
/// let report = getrf_nopivot(2, 2, &mut a, 2, &LuConfig::default()).unwrap();
/// assert_eq!(report.info(), 0);
/// assert_eq!(a, vec![4.0, 3.0, 1.5, -1.5]);
/// ```
pub fn getrf_nopivot<T: ComplexField>(
    m: usize,
    n: usize,
    a: &mut [T],
    lda: usize,
    config: &LuConfig,
) -> Result<LuReport> {
    let distribution = CyclicDistribution::new(config.lanes)?;
    getrf_nopivot_with(m, n, a, lda, config, distribution)
}

/// [`getrf_nopivot`] with a caller-supplied row distribution
pub fn getrf_nopivot_with<T, D>(
    m: usize,
    n: usize,
    a: &mut [T],
    lda: usize,
    config: &LuConfig,
    distribution: D,
) -> Result<LuReport>
where
    T: ComplexField,
    D: RowDistribution,
{
    config.validate()?;
    let layout = MatrixLayout::new(m, n, lda)?;
    layout.check_limits(config)?;
    layout.check_buffer(a.len())?;

    let lanes = distribution.lanes();
    log::debug!(
        "getrf_nopivot: {}x{} (lda {}), {} lanes ({}), policy {:?}",
        m,
        n,
        lda,
        lanes,
        if config.parallel && is_parallel_available() {
            "parallel"
        } else {
            "sequential"
        },
        config.singular_policy
    );

    let mut buffer = LaneBuffer::load(a, &layout, distribution)?;
    let stats = factorize_buffer(&mut buffer, config)?;
    buffer.store(a, &layout)?;

    Ok(LuReport {
        rows: m,
        cols: n,
        lanes,
        stats,
    })
}

/// Run the elimination sweep over an already loaded buffer
pub(crate) fn factorize_buffer<T, D>(
    buffer: &mut LaneBuffer<T, D>,
    config: &LuConfig,
) -> Result<SweepStats>
where
    T: ComplexField,
    D: RowDistribution,
{
    let sweep = SweepController::new(config, buffer.rows(), buffer.cols());
    if config.parallel && config.dedicated_pool {
        let threads = buffer.distribution().lanes();
        run_in_pool(threads, move || sweep.run(buffer))?
    } else {
        sweep.run(buffer)
    }
}
