//! Statistical reduction of raw probe timings
//!
//! Semantics match the conventional definitions: the median of an
//! even-length set is the mean of the two middle values, and the standard
//! deviation uses the n-1 (sample) divisor. A single success yields a
//! stdev of exactly 0; zero successes yield no derived fields at all.

use crate::models::{PairStatistics, SampleOutcome};

/// Reduce per-attempt outcomes into a `PairStatistics` record
pub fn summarize(outcomes: &[SampleOutcome]) -> PairStatistics {
    let samples: Vec<f64> = outcomes.iter().filter_map(|o| o.elapsed_ms()).collect();
    let failure_count = (outcomes.len() - samples.len()) as u32;

    if samples.is_empty() {
        return PairStatistics::all_failed(failure_count);
    }

    let success_count = samples.len() as u32;
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = samples.iter().sum::<f64>() / samples.len() as f64;

    let mut sorted = samples.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    PairStatistics {
        min: Some(min),
        max: Some(max),
        avg: Some(avg),
        median: Some(median_of_sorted(&sorted)),
        stdev: Some(sample_stdev(&samples, avg)),
        success_count,
        failure_count,
        raw_samples: samples,
    }
}

/// Median of an already-sorted slice; even lengths average the middle pair
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Sample standard deviation (n-1 divisor); 0 for a single value
fn sample_stdev(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let sum_squared_diff: f64 = samples.iter().map(|&x| (x - mean).powi(2)).sum();
    (sum_squared_diff / (samples.len() - 1) as f64).sqrt()
}
