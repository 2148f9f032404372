//! Row-to-lane distribution
//!
//! The lane buffer never computes lane or offset arithmetic itself; it goes
//! through a [`RowDistribution`] so the assignment policy stays in one place.

use crate::error::{LuError, Result};

/// Maps logical rows of the matrix onto computation lanes.
pub trait RowDistribution: Send + Sync {
    /// Number of lanes rows are spread over
    fn lanes(&self) -> usize;

    /// Lane and local offset holding global row `row`
    fn locate(&self, row: usize) -> (usize, usize);

    /// Global row stored at `local` in `lane`
    fn global_row(&self, lane: usize, local: usize) -> usize;

    /// How many of the first `rows` global rows live in `lane`
    fn rows_in_lane(&self, lane: usize, rows: usize) -> usize;

    /// First local offset in `lane` whose global row is strictly below `step`
    fn first_local_below(&self, lane: usize, step: usize) -> usize;
}

/// Row-cyclic distribution: row `r` lives in lane `r % lanes` at offset `r / lanes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicDistribution {
    lanes: usize,
}

impl CyclicDistribution {
    /// Create a cyclic distribution over `lanes` lanes
    pub fn new(lanes: usize) -> Result<Self> {
        if lanes == 0 {
            return Err(LuError::InvalidLaneCount);
        }
        Ok(Self { lanes })
    }
}

impl RowDistribution for CyclicDistribution {
    #[inline]
    fn lanes(&self) -> usize {
        self.lanes
    }

    #[inline]
    fn locate(&self, row: usize) -> (usize, usize) {
        (row % self.lanes, row / self.lanes)
    }

    #[inline]
    fn global_row(&self, lane: usize, local: usize) -> usize {
        local * self.lanes + lane
    }

    #[inline]
    fn rows_in_lane(&self, lane: usize, rows: usize) -> usize {
        if lane >= rows {
            0
        } else {
            (rows - lane).div_ceil(self.lanes)
        }
    }

    #[inline]
    fn first_local_below(&self, lane: usize, step: usize) -> usize {
        if lane <= step % self.lanes {
            step / self.lanes + 1
        } else {
            step / self.lanes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_roundtrip() {
        let dist = CyclicDistribution::new(3).unwrap();
        assert_eq!(dist.locate(0), (0, 0));
        assert_eq!(dist.locate(4), (1, 1));
        assert_eq!(dist.locate(8), (2, 2));
        for row in 0..50 {
            let (lane, local) = dist.locate(row);
            assert_eq!(dist.global_row(lane, local), row);
        }
    }

    #[test]
    fn test_rows_in_lane() {
        let dist = CyclicDistribution::new(4).unwrap();
        // 10 rows over 4 lanes: 3, 3, 2, 2
        let counts: Vec<usize> = (0..4).map(|lane| dist.rows_in_lane(lane, 10)).collect();
        assert_eq!(counts, vec![3, 3, 2, 2]);
        assert_eq!(counts.iter().sum::<usize>(), 10);

        // Fewer rows than lanes leaves trailing lanes empty
        assert_eq!(dist.rows_in_lane(3, 2), 0);
        assert_eq!(dist.rows_in_lane(1, 2), 1);
    }

    #[test]
    fn test_first_local_below_is_strictly_below_step() {
        for lanes in 1..6 {
            let dist = CyclicDistribution::new(lanes).unwrap();
            for step in 0..20 {
                for lane in 0..lanes {
                    let local = dist.first_local_below(lane, step);
                    assert!(dist.global_row(lane, local) > step);
                    if local > 0 {
                        assert!(dist.global_row(lane, local - 1) <= step);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_lanes_rejected() {
        assert!(matches!(
            CyclicDistribution::new(0),
            Err(LuError::InvalidLaneCount)
        ));
    }
}
