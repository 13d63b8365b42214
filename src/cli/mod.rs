//! Command-line interface definition

use clap::Parser;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rlb",
    version = crate::VERSION,
    long_version = crate::long_version(),
    about = "Latency benchmark for JSON-RPC and WebSocket-RPC providers",
    long_about = "Issues repeated timed probes against a set of named RPC providers, \
                  reduces the timings into per-(provider, method) statistics, and \
                  prints a ranked comparison report with an optional JSON export."
)]
pub struct Cli {
    /// Providers to probe as name=url pairs; replaces the default set
    #[arg(value_name = "NAME=URL")]
    pub endpoints: Vec<String>,

    /// Number of sample attempts per (provider, method) pair
    #[arg(
        short = 'n',
        long,
        env = "RLB_NUM_TESTS",
        value_name = "COUNT",
        default_value_t = crate::defaults::DEFAULT_NUM_TESTS
    )]
    pub num_tests: u32,

    /// RPC method to probe, as name or name=json-params; repeatable,
    /// replaces the default method set
    #[arg(short = 'm', long = "method", value_name = "NAME[=PARAMS]")]
    pub methods: Vec<String>,

    /// Skip the TCP reachability pass
    #[arg(long = "no-network-test")]
    pub no_network_test: bool,

    /// Suppress per-attempt progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Write a JSON export; without a path a timestamped file is used
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub export: Option<Option<String>>,

    /// Include flattened per-pair rows in the export
    #[arg(long, requires = "export")]
    pub export_records: bool,

    /// Reachability-probe port override as name=port; repeatable
    #[arg(long = "probe-port", value_name = "NAME=PORT")]
    pub probe_ports: Vec<String>,

    /// Disable colored output
    #[arg(long = "no-color", env = "RLB_NO_COLOR")]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Whether colored output should be used
    ///
    /// `--no-color`, `RLB_NO_COLOR` and the conventional `NO_COLOR`
    /// variable all disable color.
    pub fn use_colors(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}
