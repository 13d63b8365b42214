//! Probe scheduling: fixed-count sample loops over the configured
//! (provider, method) grid
//!
//! The runner never aborts a pair early: every attempt's outcome is
//! recorded, failures included, and the pair always reduces to a
//! `PairStatistics`. Progress reporting goes through the `ProbeObserver`
//! seam so measurement stays free of formatting concerns.

use crate::{
    client::{self, ReachabilitySampler, Sampler},
    defaults,
    error::Result,
    models::{BenchConfig, PairStatistics, RunResult, SampleOutcome},
    stats,
};
use std::time::Duration;

/// Progress callbacks emitted while a run is in flight
///
/// All methods default to no-ops; implementors override what they need.
pub trait ProbeObserver {
    /// The reachability phase is starting
    fn on_network_phase(&self) {}

    /// A provider's reachability probe is starting
    fn on_network_probe(&self, _provider: &str, _host: &str, _port: u16) {}

    /// All RPC probes for one provider are starting
    fn on_provider_phase(&self, _provider: &str, _url: &str) {}

    /// A (provider, method) probe run is starting
    fn on_probe_start(&self, _provider: &str, _method: &str) {}

    /// One attempt finished; `attempt` is 1-based
    fn on_attempt(&self, _attempt: u32, _total: u32, _outcome: &SampleOutcome) {}

    /// A probe run finished and was reduced to statistics
    fn on_probe_complete(&self, _provider: &str, _method: &str, _stats: &PairStatistics) {}
}

/// Observer that swallows all progress events
pub struct NullObserver;

impl ProbeObserver for NullObserver {}

/// Runs one fixed-count sample loop against a single sampler
pub struct ProbeRunner {
    num_tests: u32,
    pause: Duration,
}

impl ProbeRunner {
    pub fn new(num_tests: u32) -> Self {
        Self::with_pause(num_tests, defaults::INTER_ATTEMPT_PAUSE)
    }

    pub fn with_pause(num_tests: u32, pause: Duration) -> Self {
        Self { num_tests, pause }
    }

    /// Take `num_tests` samples, pausing between attempts but not after
    /// the last one
    pub async fn run(
        &self,
        sampler: &mut dyn Sampler,
        observer: &dyn ProbeObserver,
    ) -> PairStatistics {
        let mut outcomes = Vec::with_capacity(self.num_tests as usize);

        for attempt in 1..=self.num_tests {
            let outcome = sampler.sample().await;
            observer.on_attempt(attempt, self.num_tests, &outcome);
            outcomes.push(outcome);

            if attempt < self.num_tests {
                tokio::time::sleep(self.pause).await;
            }
        }

        stats::summarize(&outcomes)
    }
}

/// Drives a whole benchmark invocation and assembles the `RunResult`
///
/// Order is deterministic: an optional reachability pass over all
/// providers first, then every (provider, method) pair with methods
/// iterated inside each provider. Pairs never run concurrently, so
/// probes cannot contend for bandwidth with each other.
pub struct Aggregator {
    config: BenchConfig,
    runner: ProbeRunner,
}

impl Aggregator {
    pub fn new(config: BenchConfig) -> Self {
        let runner = ProbeRunner::new(config.num_tests);
        Self { config, runner }
    }

    #[cfg(test)]
    fn with_runner(config: BenchConfig, runner: ProbeRunner) -> Self {
        Self { config, runner }
    }

    pub async fn run(&self, observer: &dyn ProbeObserver) -> Result<RunResult> {
        let mut result = RunResult::new();

        if self.config.network_test {
            observer.on_network_phase();
            for endpoint in &self.config.endpoints {
                let mut sampler = ReachabilitySampler::new(endpoint)?;
                observer.on_network_probe(&endpoint.name, sampler.host(), sampler.port());
                let stats = self.runner.run(&mut sampler, observer).await;
                observer.on_probe_complete(&endpoint.name, "network", &stats);
                result.record_network(&endpoint.name, stats);
            }
        }

        for endpoint in &self.config.endpoints {
            observer.on_provider_phase(&endpoint.name, &endpoint.url);
            for method in &self.config.methods {
                observer.on_probe_start(&endpoint.name, &method.method);
                let mut sampler = client::rpc_sampler(endpoint, method)?;
                let stats = self.runner.run(sampler.as_mut(), observer).await;
                observer.on_probe_complete(&endpoint.name, &method.method, &stats);
                result.record_pair(&method.method, &endpoint.name, stats);
            }
        }

        Ok(result)
    }
}
