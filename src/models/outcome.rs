//! Sample outcomes and aggregated benchmark results
//!
//! `SampleOutcome` is produced once per attempt and is immutable.
//! `PairStatistics` is the per-(provider, method) reduction; derived
//! fields are `None` when no attempt succeeded, never zero-filled.

use crate::types::FailureKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Result of a single timed probe attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SampleOutcome {
    /// Round trip completed; elapsed wall-clock time in milliseconds
    Success { elapsed_ms: f64 },
    /// Attempt failed; excluded from latency statistics
    Failure { kind: FailureKind, detail: String },
}

impl SampleOutcome {
    /// Create a successful outcome
    pub fn success(elapsed_ms: f64) -> Self {
        Self::Success { elapsed_ms }
    }

    /// Create a failed outcome
    pub fn failure<S: Into<String>>(kind: FailureKind, detail: S) -> Self {
        Self::Failure {
            kind,
            detail: detail.into(),
        }
    }

    /// Elapsed milliseconds for successful attempts
    pub fn elapsed_ms(&self) -> Option<f64> {
        match self {
            Self::Success { elapsed_ms } => Some(*elapsed_ms),
            Self::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Aggregated statistics for one (provider, method) pair or one
/// provider's reachability probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStatistics {
    /// Minimum successful latency (ms); absent when no attempt succeeded
    pub min: Option<f64>,

    /// Maximum successful latency (ms)
    pub max: Option<f64>,

    /// Mean of successful latencies (ms)
    pub avg: Option<f64>,

    /// Median of successful latencies (ms)
    pub median: Option<f64>,

    /// Sample standard deviation of successful latencies (ms);
    /// exactly 0 for a single success, absent for none
    pub stdev: Option<f64>,

    /// Number of successful attempts
    pub success_count: u32,

    /// Number of failed attempts
    pub failure_count: u32,

    /// Successful latencies in attempt order (ms)
    pub raw_samples: Vec<f64>,
}

impl PairStatistics {
    /// Statistics record for a pair with zero successes
    pub fn all_failed(failure_count: u32) -> Self {
        Self {
            min: None,
            max: None,
            avg: None,
            median: None,
            stdev: None,
            success_count: 0,
            failure_count,
            raw_samples: Vec::new(),
        }
    }

    /// Whether any attempt succeeded and derived fields are present
    pub fn has_statistics(&self) -> bool {
        self.success_count > 0
    }

    /// Total attempts recorded
    pub fn sample_count(&self) -> u32 {
        self.success_count + self.failure_count
    }
}

/// Complete results of one benchmark invocation
///
/// Populated incrementally by the aggregator, immutable once the run
/// finishes, then handed to the reporter and exporter and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Correlation ID generated once per invocation
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// method name -> provider name -> statistics
    pub methods: HashMap<String, HashMap<String, PairStatistics>>,

    /// provider name -> transport-connect statistics
    pub network: HashMap<String, PairStatistics>,
}

impl RunResult {
    /// Create an empty run result with a fresh run ID
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            methods: HashMap::new(),
            network: HashMap::new(),
        }
    }

    /// Record a (provider, method) pair's statistics
    pub fn record_pair(&mut self, method: &str, provider: &str, stats: PairStatistics) {
        self.methods
            .entry(method.to_string())
            .or_default()
            .insert(provider.to_string(), stats);
    }

    /// Record a provider's reachability statistics
    pub fn record_network(&mut self, provider: &str, stats: PairStatistics) {
        self.network.insert(provider.to_string(), stats);
    }

    /// Per-provider medians for one method, restricted to providers with
    /// at least one success; `provider_order` fixes the output order
    pub fn medians_for_method(
        &self,
        method: &str,
        provider_order: &[String],
    ) -> Vec<(String, f64)> {
        let Some(providers) = self.methods.get(method) else {
            return Vec::new();
        };
        provider_order
            .iter()
            .filter_map(|name| {
                providers
                    .get(name)
                    .and_then(|stats| stats.median)
                    .map(|median| (name.clone(), median))
            })
            .collect()
    }

    /// Flatten all completed pairs into export records
    pub fn flatten_records(&self, method_order: &[String], provider_order: &[String]) -> Vec<PairRecord> {
        let mut records = Vec::new();

        for provider in provider_order {
            if let Some(stats) = self.network.get(provider) {
                records.push(PairRecord::new(
                    self.run_id,
                    provider,
                    "network",
                    "network",
                    stats,
                ));
            }
        }

        for method in method_order {
            let Some(providers) = self.methods.get(method) else {
                continue;
            };
            for provider in provider_order {
                if let Some(stats) = providers.get(provider) {
                    records.push(PairRecord::new(self.run_id, provider, method, "rpc", stats));
                }
            }
        }

        records
    }
}

impl Default for RunResult {
    fn default() -> Self {
        Self::new()
    }
}

/// One flattened per-(provider, method) row, suitable for bulk insertion
/// into a tabular store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub run_id: Uuid,
    pub provider: String,
    pub method: String,
    pub test_type: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub median: Option<f64>,
    pub stdev: Option<f64>,
    pub success_count: u32,
    pub failure_count: u32,
}

impl PairRecord {
    fn new(
        run_id: Uuid,
        provider: &str,
        method: &str,
        test_type: &str,
        stats: &PairStatistics,
    ) -> Self {
        Self {
            run_id,
            provider: provider.to_string(),
            method: method.to_string(),
            test_type: test_type.to_string(),
            min: stats.min,
            max: stats.max,
            avg: stats.avg,
            median: stats.median,
            stdev: stats.stdev,
            success_count: stats.success_count,
            failure_count: stats.failure_count,
        }
    }
}
