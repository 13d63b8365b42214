//! Data models for configuration and benchmark results

pub mod config;
pub mod outcome;

pub use config::{BenchConfig, Endpoint, MethodSpec};
pub use outcome::{PairRecord, PairStatistics, RunResult, SampleOutcome};
