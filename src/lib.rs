//! RPC Latency Bench
//!
//! A latency-measurement and comparison tool for remote JSON-RPC and
//! WebSocket-RPC endpoints. It issues repeated timed probes against a
//! configurable set of named providers, reduces the raw timings into
//! per-(provider, method) statistics, and produces a ranked comparison
//! report plus an optional JSON export.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod export;
pub mod logging;
pub mod models;
pub mod output;
pub mod ranking;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{BenchConfig, Endpoint, MethodSpec, PairStatistics, RunResult, SampleOutcome};
pub use ranking::{overall_ranking, pairwise_comparison, rank_by_median, relative_scale};
pub use types::{FailureKind, LatencyLevel, Transport};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata emitted by the build script
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = match option_env!("GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// Extended version string shown by `--version`
pub fn long_version() -> String {
    format!("{} (commit {}, built {})", VERSION, GIT_COMMIT, BUILD_TIME)
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_NUM_TESTS: u32 = 5;
    pub const RPC_TIMEOUT: Duration = Duration::from_secs(10);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
    pub const INTER_ATTEMPT_PAUSE: Duration = Duration::from_millis(500);

    /// Default named providers, overridable with `name=url` arguments
    pub const DEFAULT_ENDPOINTS: &[(&str, &str)] =
        &[("Official", "https://api.mainnet-beta.solana.com")];

    /// Default RPC methods probed against every provider
    pub const DEFAULT_METHODS: &[(&str, &str)] = &[
        ("getHealth", "[]"),
        ("getLatestBlockhash", r#"[{"commitment":"processed"}]"#),
        ("getSlot", "[]"),
        ("getVersion", "[]"),
    ];

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
