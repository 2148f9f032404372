//! Pivot row extraction

use crate::buffer::LaneBuffer;
use crate::distribution::RowDistribution;
use crate::traits::ComplexField;
use ndarray::{Array1, ArrayView1, s};

/// Row `step` of the matrix, columns `step..n`, shared read-only by every lane.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow<T: ComplexField> {
    step: usize,
    values: Array1<T>,
}

impl<T: ComplexField> PivotRow<T> {
    /// Copy the pivot row for `step` out of the buffer.
    ///
    /// The buffer is not modified. `step` must be a valid column index.
    pub fn extract<D: RowDistribution>(buffer: &LaneBuffer<T, D>, step: usize) -> Self {
        debug_assert!(step < buffer.rows() && step < buffer.cols());
        let values = buffer.row(step).slice(s![step..]).to_owned();
        Self { step, values }
    }

    /// Elimination step this row belongs to
    pub fn step(&self) -> usize {
        self.step
    }

    /// Diagonal entry a00, the divisor of this step
    pub fn diagonal(&self) -> T {
        self.values[0]
    }

    /// Entry in global column `col` (`col >= step`)
    pub fn at(&self, col: usize) -> T {
        self.values[col - self.step]
    }

    /// Entries right of the diagonal, columns `step+1..n`
    pub fn trailing(&self) -> ArrayView1<'_, T> {
        self.values.slice(s![1..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::CyclicDistribution;
    use ndarray::array;

    #[test]
    fn test_extract_pivot_row() {
        let a = array![[4.0_f64, 3.0, 2.0], [2.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
        let buffer = LaneBuffer::from_array(&a.view(), CyclicDistribution::new(2).unwrap());

        let pivot = PivotRow::extract(&buffer, 1);
        assert_eq!(pivot.step(), 1);
        assert_eq!(pivot.diagonal(), 1.0);
        assert_eq!(pivot.at(2), 1.0);
        assert_eq!(pivot.trailing(), array![1.0]);

        // Extraction leaves the buffer unchanged
        assert_eq!(buffer.to_array(), a);
    }

    #[test]
    fn test_last_column_pivot_has_no_trailing_part() {
        let a = array![[1.0_f64, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let buffer = LaneBuffer::from_array(&a.view(), CyclicDistribution::new(3).unwrap());

        let pivot = PivotRow::extract(&buffer, 1);
        assert_eq!(pivot.diagonal(), 4.0);
        assert_eq!(pivot.trailing().len(), 0);
    }
}
