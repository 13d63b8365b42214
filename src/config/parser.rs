//! Parsers for endpoint, method and port-override arguments

use crate::{
    error::{AppError, Result},
    models::{Endpoint, MethodSpec},
};

/// Parse a comma-separated `name=url,name=url` list, as carried by the
/// `RLB_ENDPOINTS` environment variable
pub fn parse_endpoint_list(raw: &str) -> Result<Vec<Endpoint>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Endpoint::parse_arg)
        .collect()
}

/// Parse positional `name=url` arguments
pub fn parse_endpoint_args(args: &[String]) -> Result<Vec<Endpoint>> {
    args.iter().map(|arg| Endpoint::parse_arg(arg)).collect()
}

/// Parse repeated `--method name[=json-params]` arguments
pub fn parse_method_args(args: &[String]) -> Result<Vec<MethodSpec>> {
    args.iter().map(|arg| MethodSpec::parse_arg(arg)).collect()
}

/// Parse a `--probe-port name=port` argument
pub fn parse_port_override(raw: &str) -> Result<(String, u16)> {
    let (name, port) = raw.split_once('=').ok_or_else(|| {
        AppError::config(format!(
            "Invalid port override '{}'. Use 'name=port' format.",
            raw
        ))
    })?;

    if name.is_empty() {
        return Err(AppError::config(format!(
            "Invalid port override '{}'. Use 'name=port' format.",
            raw
        )));
    }

    let port: u16 = port
        .parse()
        .map_err(|_| AppError::config(format!("Invalid port '{}' for provider '{}'", port, name)))?;

    Ok((name.to_string(), port))
}
