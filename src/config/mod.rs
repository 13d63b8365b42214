//! Configuration assembly
//!
//! Precedence, lowest to highest: built-in defaults, `.env` /
//! environment variables, command-line arguments. The `.env` file is
//! loaded in `main` before argument parsing so clap's own `env` bindings
//! see it; `RLB_ENDPOINTS` is merged here because positional arguments
//! have no clap env binding.

pub mod parser;

use crate::{
    cli::Cli,
    error::{AppError, Result},
    export,
    models::BenchConfig,
};
use chrono::Utc;
use std::path::PathBuf;

pub const ENV_ENDPOINTS: &str = "RLB_ENDPOINTS";

/// Build the final, validated configuration from all layers
pub fn load_config(cli: &Cli) -> Result<BenchConfig> {
    let env_endpoints = std::env::var(ENV_ENDPOINTS).ok();
    build_config(cli, env_endpoints.as_deref())
}

/// Layering logic, separated from process environment access for tests
fn build_config(cli: &Cli, env_endpoints: Option<&str>) -> Result<BenchConfig> {
    let mut config = BenchConfig::default();

    if let Some(raw) = env_endpoints {
        config.endpoints = parser::parse_endpoint_list(raw)?;
    }
    if !cli.endpoints.is_empty() {
        config.endpoints = parser::parse_endpoint_args(&cli.endpoints)?;
    }
    if !cli.methods.is_empty() {
        config.methods = parser::parse_method_args(&cli.methods)?;
    }

    // clap already layered RLB_NUM_TESTS below the explicit flag
    config.num_tests = cli.num_tests;
    config.network_test = !cli.no_network_test;
    config.quiet = cli.quiet;
    config.enable_color = cli.use_colors();
    config.debug = cli.debug;
    config.export = match &cli.export {
        None => None,
        Some(None) => Some(export::default_export_path(Utc::now())),
        Some(Some(path)) => Some(PathBuf::from(path)),
    };
    config.export_records = cli.export_records;

    for spec in &cli.probe_ports {
        let (name, port) = parser::parse_port_override(spec)?;
        let endpoint = config
            .endpoints
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| {
                AppError::config(format!("--probe-port names unknown provider '{}'", name))
            })?;
        endpoint.port_override = Some(port);
    }

    config.validate()?;
    Ok(config)
}
