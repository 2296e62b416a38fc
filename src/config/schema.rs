//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bus::REST_SERVICE_CHANNEL;

/// Timeout applied when none (or zero) is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Root configuration for the bridge process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Local ingress listener.
    pub listener: ListenerConfig,

    /// REST bridge settings.
    pub bridge: RestBridgeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Timeout for a whole ingress request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8090".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// REST bridge configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RestBridgeConfig {
    /// Bus channel the bridge serves.
    pub channel: String,

    /// Authority (`host[:port]`) replacing every destination URL's host.
    pub base_host: Option<String>,

    /// Per-call timeout in seconds; 0 means the default.
    pub timeout_secs: u64,
}

impl RestBridgeConfig {
    /// Timeout for outbound calls.
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }
}

impl Default for RestBridgeConfig {
    fn default() -> Self {
        Self {
            channel: REST_SERVICE_CHANNEL.to_string(),
            base_host: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive; `RUST_LOG` takes precedence.
    pub log_filter: String,

    /// Emit JSON log lines instead of the pretty format.
    pub json_logs: bool,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Address of the Prometheus scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "rest_bridge=info,tower_http=info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
