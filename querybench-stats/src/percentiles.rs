//! Percentile Computation
//!
//! Nearest-rank percentiles over an ascending-sorted sample, with the
//! two-element average when the rank lands exactly on an element boundary.
//! For `p = 0.5` this is the conventional median: the middle element for odd
//! lengths, the mean of the two middle elements for even lengths.

use std::time::Duration;

/// Percentile `p` (in `[0.0, 1.0]`) of `sorted`, which must be ascending and non-empty.
///
/// With `n` samples the 1-based rank is `ceil(n * p)`. When `n * p` is a whole
/// number the result is the mean of the elements at that rank and the next one;
/// otherwise it is the element at that rank. The rank is clamped to `[1, n]`.
///
/// # Panics
///
/// Panics if `sorted` is empty or `p` is outside `[0.0, 1.0]`.
///
/// # Examples
///
/// ```
/// # use querybench_stats::percentile;
/// # use std::time::Duration;
/// let sorted: Vec<Duration> = [10, 20, 30, 40].map(Duration::from_millis).to_vec();
/// assert_eq!(percentile(&sorted, 0.5), Duration::from_millis(25));
/// assert_eq!(percentile(&sorted, 0.9), Duration::from_millis(40));
/// ```
pub fn percentile(sorted: &[Duration], p: f64) -> Duration {
    assert!(!sorted.is_empty(), "percentile of an empty sample");
    assert!((0.0..=1.0).contains(&p), "percentile {p} outside [0, 1]");
    debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]), "samples not sorted");

    let n = sorted.len();
    let position = n as f64 * p;
    let rank = (position.ceil() as usize).clamp(1, n);
    let value = sorted[rank - 1];

    if rank as f64 == position && rank < n {
        (value + sorted[rank]) / 2
    } else {
        value
    }
}
