//! Trailing-submatrix rank-1 update

use super::pivot::PivotRow;
use crate::distribution::RowDistribution;
use crate::parallel::for_each_lane_mut;
use crate::traits::ComplexField;
use ndarray::{Array2, Zip, s};

/// Apply `A[r][c] -= A[r][s] * pivot[c]` for `c > s` on the lane's rows from `first_local` on.
///
/// Column `s` must already hold the multipliers for this step.
pub fn update_lane<T: ComplexField>(lane: &mut Array2<T>, first_local: usize, pivot: &PivotRow<T>) {
    let step = pivot.step();
    if first_local >= lane.nrows() || step + 1 >= lane.ncols() {
        return;
    }
    let trailing = pivot.trailing();
    for mut row in lane.slice_mut(s![first_local.., ..]).rows_mut() {
        let multiplier = row[step];
        Zip::from(row.slice_mut(s![step + 1..]))
            .and(&trailing)
            .for_each(|a, &p| *a -= multiplier * p);
    }
}

/// RowUpdater stage: every lane updates the rows it owns, concurrently
pub fn update<T, D>(lanes: &mut [Array2<T>], distribution: &D, pivot: &PivotRow<T>, parallel: bool)
where
    T: ComplexField,
    D: RowDistribution,
{
    let step = pivot.step();
    for_each_lane_mut(lanes, parallel, |lane_index, lane| {
        let first_local = distribution.first_local_below(lane_index, step);
        update_lane(lane, first_local, pivot);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LaneBuffer;
    use crate::distribution::CyclicDistribution;
    use crate::elimination::divide;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_update_after_divide() {
        let a = array![[4.0_f64, 3.0, 2.0], [2.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
        let mut buffer = LaneBuffer::from_array(&a.view(), CyclicDistribution::new(2).unwrap());
        let pivot = PivotRow::extract(&buffer, 0);

        let (dist, lanes) = buffer.split_lanes_mut();
        divide(lanes, dist, &pivot, true);
        update(lanes, dist, &pivot, true);

        let out = buffer.to_array();
        // Pivot row is never updated
        assert_eq!(out.row(0), a.row(0));
        // row 1: [1 - 0.5*3, 1 - 0.5*2]
        assert_relative_eq!(out[[1, 1]], -0.5);
        assert_relative_eq!(out[[1, 2]], 0.0);
        // row 2: [1 - 0.25*3, 1 - 0.25*2]
        assert_relative_eq!(out[[2, 1]], 0.25);
        assert_relative_eq!(out[[2, 2]], 0.5);
    }

    #[test]
    fn test_rows_at_or_above_step_untouched() {
        let a = array![
            [1.0_f64, 1.0, 1.0],
            [9.0, 9.0, 9.0],
            [2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0]
        ];
        let mut lane = a.clone();
        let buffer = LaneBuffer::from_array(&a.view(), CyclicDistribution::new(1).unwrap());
        let pivot = PivotRow::extract(&buffer, 1);

        // single lane: rows 0 and 1 must stay, rows 2 and 3 are updated
        update_lane(&mut lane, 2, &pivot);
        assert_eq!(lane.row(0), a.row(0));
        assert_eq!(lane.row(1), a.row(1));
        assert_relative_eq!(lane[[2, 2]], 4.0 - 3.0 * 9.0);
        assert_relative_eq!(lane[[3, 2]], 7.0 - 6.0 * 9.0);
        // column of the step itself is left to the divider
        assert_relative_eq!(lane[[3, 1]], 6.0);
    }
}
