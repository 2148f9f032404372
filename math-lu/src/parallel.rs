//! Parallel utilities with feature-gated implementations
//!
//! Lanes are processed with rayon when the `rayon` feature is enabled, with
//! sequential fallbacks otherwise. Each lane is handed out as `&mut` exactly
//! once per call, so workers never share a write target.

use crate::error::Result;
#[cfg(feature = "rayon")]
use crate::error::LuError;

/// Check if parallel processing is available
#[cfg(feature = "rayon")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "rayon"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Run `f(lane_index, lane)` for every lane, concurrently when `parallel` is set.
///
/// Returns once every lane has finished, which makes the call a barrier.
#[cfg(feature = "rayon")]
pub fn for_each_lane_mut<L, F>(lanes: &mut [L], parallel: bool, f: F)
where
    L: Send,
    F: Fn(usize, &mut L) + Sync + Send,
{
    use rayon::prelude::*;
    if parallel && lanes.len() > 1 {
        lanes
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, lane)| f(i, lane));
    } else {
        lanes.iter_mut().enumerate().for_each(|(i, lane)| f(i, lane));
    }
}

/// Sequential lane loop (fallback when parallel is not available)
#[cfg(not(feature = "rayon"))]
pub fn for_each_lane_mut<L, F>(lanes: &mut [L], _parallel: bool, f: F)
where
    F: Fn(usize, &mut L),
{
    lanes.iter_mut().enumerate().for_each(|(i, lane)| f(i, lane));
}

/// Run `f` inside a thread pool with `threads` workers
#[cfg(feature = "rayon")]
pub fn run_in_pool<U, F>(threads: usize, f: F) -> Result<U>
where
    U: Send,
    F: FnOnce() -> U + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("lu-lane-{}", i))
        .build()
        .map_err(|e| LuError::ThreadPool(e.to_string()))?;
    Ok(pool.install(f))
}

/// Run `f` on the calling thread (fallback)
#[cfg(not(feature = "rayon"))]
pub fn run_in_pool<U, F>(_threads: usize, f: F) -> Result<U>
where
    F: FnOnce() -> U,
{
    Ok(f())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_each_lane_mut() {
        let mut lanes = vec![vec![1, 2], vec![3], vec![]];
        for_each_lane_mut(&mut lanes, true, |i, lane| {
            lane.iter_mut().for_each(|v| *v *= 10);
            lane.push(i);
        });
        assert_eq!(lanes, vec![vec![10, 20, 0], vec![30, 1], vec![2]]);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let mut a: Vec<Vec<i32>> = (0..8).map(|i| vec![i; 4]).collect();
        let mut b = a.clone();
        for_each_lane_mut(&mut a, true, |i, lane| lane[i % 4] += 1);
        for_each_lane_mut(&mut b, false, |i, lane| lane[i % 4] += 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_availability_follows_feature() {
        assert_eq!(is_parallel_available(), cfg!(feature = "rayon"));
    }

    #[test]
    fn test_run_in_pool() {
        let value = run_in_pool(2, || 21 * 2).unwrap();
        assert_eq!(value, 42);
    }
}
