//! Cross-provider ranking and relative-performance math
//!
//! Rankings are derived views over a finished `RunResult`; nothing here
//! mutates or stores state. All sorts are stable so that equal medians
//! keep the provider declaration order.

use crate::models::RunResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One entry of a per-method ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProvider {
    pub provider: String,
    /// Median latency in milliseconds
    pub median: f64,
    /// 1-based ordinal rank (1 = fastest)
    pub rank: usize,
}

/// One entry of the cross-method overall ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRank {
    pub provider: String,
    /// Mean of the provider's per-method ranks, over methods it completed
    pub average_rank: f64,
}

/// Outcome of comparing two providers' medians on the same method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub faster: String,
    pub slower: String,
    /// Absolute median difference in milliseconds
    pub diff_ms: f64,
    /// `|m1 - m2| / max(m1, m2) * 100`
    pub percent: f64,
}

/// NaN-tolerant float ordering for sort keys
fn safe_float_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Rank providers ascending by median latency
///
/// The input must be in provider declaration order; the stable sort
/// guarantees that ties keep that order. Only providers with at least one
/// successful sample should be passed in.
pub fn rank_by_median(medians: &[(String, f64)]) -> Vec<RankedProvider> {
    let mut entries: Vec<(String, f64)> = medians.to_vec();
    entries.sort_by(|a, b| safe_float_cmp(a.1, b.1));

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (provider, median))| RankedProvider {
            provider,
            median,
            rank: i + 1,
        })
        .collect()
}

/// Overall ranking: average of per-method ranks, ascending
///
/// A provider contributes a rank only for methods where it completed at
/// least one successful sample; providers with no completed method are
/// excluded. Ties on average rank keep declaration order.
pub fn overall_ranking(
    result: &RunResult,
    method_order: &[String],
    provider_order: &[String],
) -> Vec<OverallRank> {
    let mut ranks_by_provider: Vec<(String, Vec<usize>)> = provider_order
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();

    for method in method_order {
        let medians = result.medians_for_method(method, provider_order);
        for ranked in rank_by_median(&medians) {
            if let Some((_, ranks)) = ranks_by_provider
                .iter_mut()
                .find(|(name, _)| *name == ranked.provider)
            {
                ranks.push(ranked.rank);
            }
        }
    }

    let mut overall: Vec<OverallRank> = ranks_by_provider
        .into_iter()
        .filter(|(_, ranks)| !ranks.is_empty())
        .map(|(provider, ranks)| OverallRank {
            provider,
            average_rank: ranks.iter().sum::<usize>() as f64 / ranks.len() as f64,
        })
        .collect();

    overall.sort_by(|a, b| safe_float_cmp(a.average_rank, b.average_rank));
    overall
}

/// Relative bar magnitude for a value against the best (lowest) value in
/// its comparison set: the best entry scales to 1.0, a value twice as
/// slow scales to 0.5. Undefined for non-positive values.
pub fn relative_scale(value: f64, best: f64) -> Option<f64> {
    if value > 0.0 {
        Some(best / value)
    } else {
        None
    }
}

/// Compare two providers' medians on the same method
///
/// The lower median is reported as "faster" by
/// `|m1 - m2| / max(m1, m2) * 100` percent. On an exact tie the first
/// provider is listed as faster with a 0% difference.
pub fn pairwise_comparison(
    provider1: &str,
    median1: f64,
    provider2: &str,
    median2: f64,
) -> PairwiseComparison {
    let diff_ms = (median1 - median2).abs();
    let slower_median = median1.max(median2);
    let percent = if slower_median > 0.0 {
        diff_ms / slower_median * 100.0
    } else {
        0.0
    };

    let (faster, slower) = if median1 <= median2 {
        (provider1, provider2)
    } else {
        (provider2, provider1)
    };

    PairwiseComparison {
        faster: faster.to_string(),
        slower: slower.to_string(),
        diff_ms,
        percent,
    }
}
