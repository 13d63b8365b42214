//! Benchmark configuration data models
//!
//! The provider map is built once by the config layer and never mutated
//! afterwards; the aggregator receives the finished, immutable config.

use crate::{
    error::{AppError, Result},
    types::Transport,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named RPC provider endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Provider name, unique within a run
    pub name: String,

    /// HTTP(S) or WS(S) URL of the provider
    pub url: String,

    /// Reachability-probe port override for providers served on
    /// non-standard ports
    pub port_override: Option<u16>,
}

impl Endpoint {
    /// Create a new endpoint with no port override
    pub fn new<N: Into<String>, U: Into<String>>(name: N, url: U) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            port_override: None,
        }
    }

    /// Parse a `name=url` argument into an endpoint
    pub fn parse_arg(arg: &str) -> Result<Self> {
        let (name, url) = arg.split_once('=').ok_or_else(|| {
            AppError::config(format!(
                "Invalid endpoint format '{}'. Use 'name=url' format.",
                arg
            ))
        })?;

        if name.is_empty() || url.is_empty() {
            return Err(AppError::config(format!(
                "Invalid endpoint format '{}'. Use 'name=url' format.",
                arg
            )));
        }

        let endpoint = Self::new(name, url);
        endpoint.validate()?;
        Ok(endpoint)
    }

    /// Validate the endpoint URL scheme and host
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| AppError::config(format!("Invalid URL for '{}': {}", self.name, e)))?;

        if Transport::from_scheme(parsed.scheme()).is_none() {
            return Err(AppError::config(format!(
                "Unsupported URL scheme '{}' for '{}' (expected http, https, ws or wss)",
                parsed.scheme(),
                self.name
            )));
        }

        if parsed.host_str().is_none() {
            return Err(AppError::config(format!(
                "URL for '{}' has no host",
                self.name
            )));
        }

        Ok(())
    }

    /// Transport implied by the URL scheme
    pub fn transport(&self) -> Result<Transport> {
        let parsed = url::Url::parse(&self.url)?;
        Transport::from_scheme(parsed.scheme()).ok_or_else(|| {
            AppError::config(format!("Unsupported URL scheme for '{}'", self.name))
        })
    }

    /// Host portion of the URL (query strings and paths stripped)
    pub fn host(&self) -> Result<String> {
        let parsed = url::Url::parse(&self.url)?;
        parsed
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::config(format!("URL for '{}' has no host", self.name)))
    }

    /// Port used by the reachability probe: explicit override first, then
    /// a `:port` suffix in the URL, then the scheme default
    pub fn probe_port(&self) -> Result<u16> {
        if let Some(port) = self.port_override {
            return Ok(port);
        }
        let parsed = url::Url::parse(&self.url)?;
        Ok(parsed
            .port()
            .unwrap_or_else(|| Transport::default_port(parsed.scheme())))
    }
}

/// An RPC call template: method name plus positional parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    /// RPC method name
    pub method: String,

    /// Positional parameters, order significant
    pub params: Vec<serde_json::Value>,
}

impl MethodSpec {
    /// Create a method spec with no parameters
    pub fn new<S: Into<String>>(method: S) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
        }
    }

    /// Create a method spec with positional parameters
    pub fn with_params<S: Into<String>>(method: S, params: Vec<serde_json::Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Parse a `name` or `name=json-array` argument
    pub fn parse_arg(arg: &str) -> Result<Self> {
        match arg.split_once('=') {
            None => Ok(Self::new(arg)),
            Some((method, raw_params)) => {
                let value: serde_json::Value = serde_json::from_str(raw_params).map_err(|e| {
                    AppError::config(format!("Invalid params for method '{}': {}", method, e))
                })?;
                let params = match value {
                    serde_json::Value::Array(items) => items,
                    other => vec![other],
                };
                Ok(Self::with_params(method, params))
            }
        }
    }
}

/// Complete, immutable benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Providers to probe, in declaration order (ranking tie-break order)
    pub endpoints: Vec<Endpoint>,

    /// RPC methods to probe, in declaration order
    pub methods: Vec<MethodSpec>,

    /// Number of sample attempts per (provider, method) pair
    pub num_tests: u32,

    /// Run the transport-connect reachability pass before RPC probes
    pub network_test: bool,

    /// Suppress per-attempt output lines
    pub quiet: bool,

    /// Enable colored terminal output
    pub enable_color: bool,

    /// Enable debug logging
    pub debug: bool,

    /// Export destination, if requested
    pub export: Option<PathBuf>,

    /// Include the flattened per-pair record list in the export
    pub export_records: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            endpoints: crate::defaults::DEFAULT_ENDPOINTS
                .iter()
                .map(|(name, url)| Endpoint::new(*name, *url))
                .collect(),
            methods: crate::defaults::DEFAULT_METHODS
                .iter()
                .map(|(method, params)| {
                    MethodSpec::with_params(
                        *method,
                        serde_json::from_str::<Vec<serde_json::Value>>(params)
                            .expect("default method params are valid JSON arrays"),
                    )
                })
                .collect(),
            num_tests: crate::defaults::DEFAULT_NUM_TESTS,
            network_test: true,
            quiet: false,
            enable_color: crate::defaults::DEFAULT_ENABLE_COLOR,
            debug: false,
            export: None,
            export_records: false,
        }
    }
}

impl BenchConfig {
    /// Validate the complete configuration before any probing starts
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(AppError::config("No endpoints configured"));
        }
        if self.methods.is_empty() {
            return Err(AppError::config("No methods configured"));
        }
        if self.num_tests == 0 {
            return Err(AppError::config("--num-tests must be greater than 0"));
        }

        for endpoint in &self.endpoints {
            endpoint.validate()?;
        }

        let mut seen = std::collections::HashSet::new();
        for endpoint in &self.endpoints {
            if !seen.insert(endpoint.name.as_str()) {
                return Err(AppError::config(format!(
                    "Duplicate provider name '{}'",
                    endpoint.name
                )));
            }
        }

        Ok(())
    }

    /// Provider names in declaration order
    pub fn provider_order(&self) -> Vec<String> {
        self.endpoints.iter().map(|e| e.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_parse_arg() {
        let endpoint = Endpoint::parse_arg("Helius=https://mainnet.helius-rpc.com").unwrap();
        assert_eq!(endpoint.name, "Helius");
        assert_eq!(endpoint.url, "https://mainnet.helius-rpc.com");
        assert!(endpoint.port_override.is_none());
    }

    #[test]
    fn test_endpoint_parse_arg_url_with_equals() {
        // API-key query strings contain '=' and must survive the split
        let endpoint = Endpoint::parse_arg("Helius=https://rpc.example.com/?api-key=abc=def").unwrap();
        assert_eq!(endpoint.url, "https://rpc.example.com/?api-key=abc=def");
    }

    #[test]
    fn test_endpoint_parse_arg_invalid() {
        assert!(Endpoint::parse_arg("no-separator").is_err());
        assert!(Endpoint::parse_arg("=https://example.com").is_err());
        assert!(Endpoint::parse_arg("name=").is_err());
        assert!(Endpoint::parse_arg("name=not a url").is_err());
        assert!(Endpoint::parse_arg("name=ftp://example.com").is_err());
    }

    #[test]
    fn test_probe_port_derivation() {
        let https = Endpoint::new("A", "https://rpc.example.com/path?key=x");
        assert_eq!(https.probe_port().unwrap(), 443);

        let wss = Endpoint::new("B", "wss://rpc.example.com");
        assert_eq!(wss.probe_port().unwrap(), 443);

        let ws = Endpoint::new("C", "ws://rpc.example.com");
        assert_eq!(ws.probe_port().unwrap(), 80);

        let explicit = Endpoint::new("D", "ws://162.249.175.2:8900");
        assert_eq!(explicit.probe_port().unwrap(), 8900);

        let mut overridden = Endpoint::new("E", "https://rpc.example.com");
        overridden.port_override = Some(8899);
        assert_eq!(overridden.probe_port().unwrap(), 8899);
    }

    #[test]
    fn test_endpoint_host_strips_path_and_query() {
        let endpoint = Endpoint::new("A", "https://rpc.example.com/v1/?api-key=secret");
        assert_eq!(endpoint.host().unwrap(), "rpc.example.com");
    }

    #[test]
    fn test_endpoint_transport() {
        assert_eq!(
            Endpoint::new("A", "https://x.com").transport().unwrap(),
            Transport::Http
        );
        assert_eq!(
            Endpoint::new("B", "wss://x.com").transport().unwrap(),
            Transport::WebSocket
        );
    }

    #[test]
    fn test_method_spec_parse_arg() {
        let plain = MethodSpec::parse_arg("getSlot").unwrap();
        assert_eq!(plain.method, "getSlot");
        assert!(plain.params.is_empty());

        let with_params =
            MethodSpec::parse_arg(r#"getLatestBlockhash=[{"commitment":"processed"}]"#).unwrap();
        assert_eq!(with_params.method, "getLatestBlockhash");
        assert_eq!(with_params.params, vec![json!({"commitment":"processed"})]);

        assert!(MethodSpec::parse_arg("getSlot={bad json").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = BenchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_tests, crate::defaults::DEFAULT_NUM_TESTS);
        assert_eq!(config.methods.len(), 4);
        assert!(config.network_test);
    }

    #[test]
    fn test_config_rejects_duplicates_and_empties() {
        let mut config = BenchConfig::default();
        config.endpoints = vec![
            Endpoint::new("A", "https://one.example.com"),
            Endpoint::new("A", "https://two.example.com"),
        ];
        assert!(config.validate().is_err());

        config.endpoints.clear();
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.num_tests = 0;
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.methods.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_order_is_declaration_order() {
        let mut config = BenchConfig::default();
        config.endpoints = vec![
            Endpoint::new("Zeta", "https://z.example.com"),
            Endpoint::new("Alpha", "https://a.example.com"),
        ];
        assert_eq!(config.provider_order(), vec!["Zeta", "Alpha"]);
    }
}
