//! Summary Statistics
//!
//! Reduces an unordered multiset of query durations to a single report:
//! - Extremes, total and truncated mean as exact durations
//! - Median and p95 via [`percentile`] over the sorted sample
//! - Population standard deviation in milliseconds, computed with Welford's
//!   single-pass update rather than the sum-of-squares formula
//!
//! Everything is derived from the sorted copy, so the result depends only on
//! the multiset of durations and never on arrival order.

use crate::TAIL_PERCENTILE;
use crate::percentiles::percentile;
use std::time::Duration;

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Aggregate latency statistics for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    /// Number of samples
    pub count: usize,
    /// Fastest query
    pub min: Duration,
    /// Slowest query
    pub max: Duration,
    /// Sum of all query durations
    pub total: Duration,
    /// `total / count`, truncated to whole nanoseconds
    pub average: Duration,
    /// 50th percentile
    pub median: Duration,
    /// 95th percentile
    pub p95: Duration,
    /// Population standard deviation, in milliseconds
    pub std_dev: f64,
}

/// Compute summary statistics over `durations`.
///
/// # Panics
///
/// Panics if `durations` is empty: a run always has at least one query, so an
/// empty input is a caller bug rather than a reportable condition.
pub fn compute_summary(durations: &[Duration]) -> SummaryStats {
    assert!(!durations.is_empty(), "compute_summary called with no samples");

    let mut sorted = durations.to_vec();
    sorted.sort_unstable();

    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];

    let mut total = Duration::ZERO;
    let mut welford = Welford::default();
    for &duration in &sorted {
        total += duration;
        welford.push(duration.as_nanos() as f64 / NANOS_PER_MILLI);
    }

    let average = Duration::from_nanos((total.as_nanos() / count as u128) as u64);

    SummaryStats {
        count,
        min,
        max,
        total,
        average,
        median: percentile(&sorted, 0.5),
        p95: percentile(&sorted, TAIL_PERCENTILE),
        std_dev: welford.population_std_dev(),
    }
}

impl SummaryStats {
    /// Minimum in milliseconds
    pub fn min_ms(&self) -> f64 {
        as_ms(self.min)
    }

    /// Maximum in milliseconds
    pub fn max_ms(&self) -> f64 {
        as_ms(self.max)
    }

    /// Total in milliseconds
    pub fn total_ms(&self) -> f64 {
        as_ms(self.total)
    }

    /// Average in milliseconds
    pub fn average_ms(&self) -> f64 {
        as_ms(self.average)
    }

    /// Median in milliseconds
    pub fn median_ms(&self) -> f64 {
        as_ms(self.median)
    }

    /// 95th percentile in milliseconds
    pub fn p95_ms(&self) -> f64 {
        as_ms(self.p95)
    }

    /// Sum of query time divided by wall time: how many queries ran at once on average
    pub fn parallel_speedup(&self, wall_time: Duration) -> f64 {
        if wall_time.is_zero() {
            0.0
        } else {
            self.total.as_secs_f64() / wall_time.as_secs_f64()
        }
    }
}

fn as_ms(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / NANOS_PER_MILLI
}

/// Running mean and sum of squared deviations
#[derive(Debug, Default)]
struct Welford {
    n: f64,
    mean: f64,
    m2: f64,
}

impl Welford {
    fn push(&mut self, x: f64) {
        self.n += 1.0;
        let next_mean = self.mean + (x - self.mean) / self.n;
        self.m2 += (x - self.mean) * (x - next_mean);
        self.mean = next_mean;
    }

    fn population_std_dev(&self) -> f64 {
        if self.n == 0.0 {
            0.0
        } else {
            (self.m2 / self.n).sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn millis(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_millis).collect()
    }

    const REFERENCE_MS: [u64; 12] = [
        56354, 34453, 896789, 54362, 425467, 87665, 123413, 356346, 986878, 131374, 97987, 85644,
    ];

    #[test]
    fn test_reference_summary() {
        let summary = compute_summary(&millis(&REFERENCE_MS));

        assert_eq!(summary.count, 12);
        assert_eq!(summary.min, Duration::from_millis(34453));
        assert_eq!(summary.max, Duration::from_millis(986878));
        assert_eq!(summary.total, Duration::from_millis(3336732));
        assert_eq!(summary.p95, Duration::from_millis(986878));
        assert_eq!(summary.average, Duration::from_millis(278061));
        assert_eq!(summary.median, Duration::from_millis(110700));
        assert!((summary.std_dev - 319214.8839603713).abs() < 1e-6);
    }

    #[test]
    fn test_order_independent() {
        let baseline = compute_summary(&millis(&REFERENCE_MS));

        let mut rng = StdRng::seed_from_u64(42);
        let mut shuffled = millis(&REFERENCE_MS);
        for _ in 0..20 {
            shuffled.shuffle(&mut rng);
            let summary = compute_summary(&shuffled);
            assert_eq!(summary, baseline);
            assert_eq!(summary.std_dev.to_bits(), baseline.std_dev.to_bits());
        }
    }

    #[test]
    fn test_single_sample() {
        let summary = compute_summary(&millis(&[7]));
        assert_eq!(summary.min, summary.max);
        assert_eq!(summary.median, Duration::from_millis(7));
        assert_eq!(summary.p95, Duration::from_millis(7));
        assert_eq!(summary.average, Duration::from_millis(7));
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_constant_samples_have_zero_std_dev() {
        let summary = compute_summary(&millis(&[100; 50]));
        assert!(summary.std_dev.abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_truncates_sub_nanosecond() {
        let summary = compute_summary(&[Duration::from_nanos(1), Duration::from_nanos(2)]);
        assert_eq!(summary.average, Duration::from_nanos(1));
    }

    #[test]
    fn test_welford_matches_naive_on_small_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut welford = Welford::default();
        for v in values {
            welford.push(v);
        }
        assert!((welford.population_std_dev() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_millisecond_accessors() {
        let summary = compute_summary(&[Duration::from_micros(1500), Duration::from_micros(2500)]);
        assert!((summary.min_ms() - 1.5).abs() < 1e-9);
        assert!((summary.max_ms() - 2.5).abs() < 1e-9);
        assert!((summary.average_ms() - 2.0).abs() < 1e-9);
        assert!((summary.total_ms() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_speedup() {
        let summary = compute_summary(&millis(&[100, 100, 100, 100]));
        assert!((summary.parallel_speedup(Duration::from_millis(100)) - 4.0).abs() < 1e-9);
        assert_eq!(summary.parallel_speedup(Duration::ZERO), 0.0);
    }

    #[test]
    #[should_panic(expected = "no samples")]
    fn test_empty_panics() {
        compute_summary(&[]);
    }
}
