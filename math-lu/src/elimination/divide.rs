//! Column scaling: L multipliers for one elimination step

use super::pivot::PivotRow;
use crate::distribution::RowDistribution;
use crate::parallel::for_each_lane_mut;
use crate::traits::ComplexField;
use ndarray::{Array2, s};

/// Divide column `pivot.step()` of the lane's rows from `first_local` on by a00.
///
/// A zero a00 produces non-finite multipliers; detection happens before this
/// stage in the sweep controller.
pub fn divide_lane<T: ComplexField>(lane: &mut Array2<T>, first_local: usize, pivot: &PivotRow<T>) {
    if first_local >= lane.nrows() {
        return;
    }
    let a00 = pivot.diagonal();
    lane.slice_mut(s![first_local.., pivot.step()])
        .map_inplace(|v| *v /= a00);
}

/// Divider stage over every lane
pub fn divide<T, D>(lanes: &mut [Array2<T>], distribution: &D, pivot: &PivotRow<T>, parallel: bool)
where
    T: ComplexField,
    D: RowDistribution,
{
    let step = pivot.step();
    for_each_lane_mut(lanes, parallel, |lane_index, lane| {
        let first_local = distribution.first_local_below(lane_index, step);
        divide_lane(lane, first_local, pivot);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LaneBuffer;
    use crate::distribution::CyclicDistribution;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_divide_scales_column_below_pivot() {
        let a = array![[4.0_f64, 3.0, 2.0], [2.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
        let mut buffer = LaneBuffer::from_array(&a.view(), CyclicDistribution::new(2).unwrap());
        let pivot = PivotRow::extract(&buffer, 0);

        let (dist, lanes) = buffer.split_lanes_mut();
        divide(lanes, dist, &pivot, false);

        let out = buffer.to_array();
        assert_relative_eq!(out[[0, 0]], 4.0);
        assert_relative_eq!(out[[1, 0]], 0.5);
        assert_relative_eq!(out[[2, 0]], 0.25);
        // Other columns untouched
        assert_relative_eq!(out[[1, 1]], 1.0);
        assert_relative_eq!(out[[2, 2]], 1.0);
    }

    #[test]
    fn test_divide_by_zero_propagates_non_finite() {
        let a = array![[0.0_f64, 1.0], [2.0, 3.0]];
        let mut buffer = LaneBuffer::from_array(&a.view(), CyclicDistribution::new(1).unwrap());
        let pivot = PivotRow::extract(&buffer, 0);

        let (dist, lanes) = buffer.split_lanes_mut();
        divide(lanes, dist, &pivot, true);

        assert!(buffer.get(1, 0).is_infinite());
    }
}
