//! Step sequencing for the elimination sweep
//!
//! The controller is a small state machine:
//!
//! ```text
//! Init -> Extract(0) -> Divide(0) -> Update(0) -> Extract(1) -> ... -> Done
//! ```
//!
//! Step `s + 1` reads a pivot row written by the update of step `s`, so steps
//! run strictly in order. Only the divide and update stages fan out over lanes.
//! When `rows <= cols` the last diagonal entry of U is never a divisor; it is
//! checked against the singular policy before the sweep reports `Done`.

use super::divide::divide;
use super::pivot::PivotRow;
use super::update::update;
use crate::buffer::LaneBuffer;
use crate::config::{LuConfig, SingularPolicy};
use crate::distribution::RowDistribution;
use crate::error::{LuError, Result};
use crate::traits::ComplexField;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

/// Number of elimination steps for an `rows x cols` matrix.
///
/// Step `s` needs a column `s`, and the last row has nothing below it.
pub fn elimination_steps(rows: usize, cols: usize) -> usize {
    rows.saturating_sub(1).min(cols)
}

/// Observable position of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// Nothing done yet
    Init,
    /// Pivot row of step `s` is about to be extracted
    Extract(usize),
    /// Multipliers of step `s` are about to be computed
    Divide(usize),
    /// Trailing update of step `s` is about to run
    Update(usize),
    /// Every step has completed
    Done,
    /// A singular pivot stopped the sweep under the strict policy
    Failed,
}

/// Summary of a completed sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepStats {
    /// Elimination steps that ran to completion
    pub steps: usize,
    /// First step whose pivot was singular, when detection is enabled
    pub first_singular_step: Option<usize>,
    /// Smallest pivot magnitude seen
    pub min_pivot_magnitude: Option<f64>,
}

enum Stage<T: ComplexField> {
    Init,
    Extract(usize),
    Divide(PivotRow<T>),
    Update(PivotRow<T>),
    Done,
    Failed,
}

/// Drives the extract / divide / update stages over a [`LaneBuffer`].
pub struct SweepController<'c, T: ComplexField> {
    config: &'c LuConfig,
    steps: usize,
    diagonal: usize,
    tolerance: T::Real,
    stage: Stage<T>,
    stats: SweepStats,
}

impl<'c, T: ComplexField> SweepController<'c, T> {
    /// Controller for an `rows x cols` matrix
    pub fn new(config: &'c LuConfig, rows: usize, cols: usize) -> Self {
        let tolerance = T::Real::from_f64(config.pivot_tolerance).unwrap_or_else(T::Real::zero);
        Self {
            config,
            steps: elimination_steps(rows, cols),
            diagonal: rows.min(cols),
            tolerance,
            stage: Stage::Init,
            stats: SweepStats::default(),
        }
    }

    /// Total number of steps this sweep will run
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Current state
    pub fn state(&self) -> SweepState {
        match &self.stage {
            Stage::Init => SweepState::Init,
            Stage::Extract(s) => SweepState::Extract(*s),
            Stage::Divide(pivot) => SweepState::Divide(pivot.step()),
            Stage::Update(pivot) => SweepState::Update(pivot.step()),
            Stage::Done => SweepState::Done,
            Stage::Failed => SweepState::Failed,
        }
    }

    /// Statistics gathered so far
    pub fn stats(&self) -> &SweepStats {
        &self.stats
    }

    /// Perform the work of the current state and move to the next one.
    ///
    /// Each divide and update call returns only after every lane finished,
    /// which is the barrier between stages. On error the sweep stays in
    /// [`SweepState::Failed`].
    pub fn advance<D: RowDistribution>(
        &mut self,
        buffer: &mut LaneBuffer<T, D>,
    ) -> Result<SweepState> {
        let stage = std::mem::replace(&mut self.stage, Stage::Failed);
        self.stage = match stage {
            Stage::Init => {
                if self.steps == 0 {
                    self.finish(buffer)?
                } else {
                    Stage::Extract(0)
                }
            }
            Stage::Extract(step) => {
                let pivot = PivotRow::extract(buffer, step);
                self.inspect(step, pivot.diagonal())?;
                Stage::Divide(pivot)
            }
            Stage::Divide(pivot) => {
                let (distribution, lanes) = buffer.split_lanes_mut();
                divide(lanes, distribution, &pivot, self.config.parallel);
                Stage::Update(pivot)
            }
            Stage::Update(pivot) => {
                let (distribution, lanes) = buffer.split_lanes_mut();
                update(lanes, distribution, &pivot, self.config.parallel);
                self.finish_step(&pivot);
                let next = pivot.step() + 1;
                if next < self.steps {
                    Stage::Extract(next)
                } else {
                    self.finish(buffer)?
                }
            }
            Stage::Done => Stage::Done,
            Stage::Failed => Stage::Failed,
        };
        Ok(self.state())
    }

    /// Run every remaining step
    pub fn run<D: RowDistribution>(mut self, buffer: &mut LaneBuffer<T, D>) -> Result<SweepStats> {
        while !matches!(self.advance(buffer)?, SweepState::Done | SweepState::Failed) {}
        Ok(self.stats)
    }

    /// Check U's last diagonal entry when no step divided by it
    fn finish<D: RowDistribution>(&mut self, buffer: &LaneBuffer<T, D>) -> Result<Stage<T>> {
        let last = self.steps;
        if last < self.diagonal {
            self.inspect(last, buffer.get(last, last))?;
        }
        Ok(Stage::Done)
    }

    fn inspect(&mut self, step: usize, a00: T) -> Result<()> {
        let magnitude = a00.norm().to_f64().unwrap_or(f64::NAN);
        self.stats.min_pivot_magnitude = Some(match self.stats.min_pivot_magnitude {
            Some(min) => min.min(magnitude),
            None => magnitude,
        });

        if self.config.singular_policy == SingularPolicy::Ignore
            || !a00.is_singular_pivot(self.tolerance)
        {
            return Ok(());
        }

        match self.config.singular_policy {
            SingularPolicy::Strict => Err(LuError::SingularPivot { step, magnitude }),
            _ => {
                if self.stats.first_singular_step.is_none() {
                    log::warn!(
                        "Singular pivot at step {} (|a00| = {:.6e}), continuing without pivoting",
                        step,
                        magnitude
                    );
                    self.stats.first_singular_step = Some(step);
                }
                Ok(())
            }
        }
    }

    fn finish_step(&mut self, pivot: &PivotRow<T>) {
        self.stats.steps += 1;
        let interval = self.config.print_interval;
        if interval > 0 && self.stats.steps % interval == 0 {
            log::info!(
                "LU step {}/{}: |a00| = {:.6e}",
                self.stats.steps,
                self.steps,
                pivot.diagonal().norm().to_f64().unwrap_or(0.0)
            );
        }
    }
}
