//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Classification of a failed sample attempt
///
/// All variants are attempt-local: they are recorded in the pair's
/// failure count and never abort the probe loop or the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Transport-level failure: DNS, refused connection, reset
    ConnectFailure,
    /// Attempt exceeded its timeout ceiling
    Timeout,
    /// Well-formed response carrying an application error field
    RpcError,
    /// Non-JSON or schema-violating payload
    MalformedResponse,
}

impl FailureKind {
    /// Short label used in logs and per-attempt output
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConnectFailure => "connect",
            FailureKind::Timeout => "timeout",
            FailureKind::RpcError => "rpc-error",
            FailureKind::MalformedResponse => "malformed",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RPC call transport, derived from the endpoint URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// Single-shot request/response: connection opened and closed per attempt
    Http,
    /// Persistent message-oriented connection, reused across attempts
    WebSocket,
}

impl Transport {
    /// Derive the transport from a URL scheme
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "http" | "https" => Some(Transport::Http),
            "ws" | "wss" => Some(Transport::WebSocket),
            _ => None,
        }
    }

    /// Default port for the given scheme when the URL carries none
    pub fn default_port(scheme: &str) -> u16 {
        match scheme {
            "https" | "wss" => 443,
            _ => 80,
        }
    }
}

/// Latency classification used for color-coding report values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyLevel {
    /// < 50ms
    Fast,
    /// 50-100ms
    Good,
    /// 100-200ms
    Moderate,
    /// >= 200ms
    Slow,
}

impl LatencyLevel {
    /// Classify a latency value in milliseconds
    pub fn from_ms(ms: f64) -> Self {
        if ms < 50.0 {
            Self::Fast
        } else if ms < 100.0 {
            Self::Good
        } else if ms < 200.0 {
            Self::Moderate
        } else {
            Self::Slow
        }
    }
}
