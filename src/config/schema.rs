//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::blockchain::types::UnmatchedTransferPolicy;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Which provider serves requests and how it merges.
    pub provider: ProviderConfig,

    /// Block explorer read API.
    pub explorer: ExplorerConfig,

    /// JSON-RPC node.
    pub rpc: RpcConfig,

    /// Background current-block refresh.
    pub block_cache: BlockCacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8088").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8088".to_string(),
        }
    }
}

/// Provider selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Registered provider name.
    pub name: String,

    /// Where an unmatched token transfer is filed on its synthesized parent.
    pub unmatched_transfer_policy: UnmatchedTransferPolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "blockscout".to_string(),
            unmatched_transfer_policy: UnmatchedTransferPolicy::default(),
        }
    }
}

/// Explorer API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Base endpoint; `module`/`action` are passed as query parameters.
    pub base_url: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blockscout.com/eth/mainnet/api".to_string(),
            timeout_secs: 60,
        }
    }
}

/// JSON-RPC node configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Node endpoint URL.
    pub endpoint: String,

    /// Basic-auth token sent as `authorization: Basic <token>`.
    pub token: String,

    /// JSON-RPC version string.
    pub version: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: String::new(),
            version: "2.0".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Current-block cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockCacheConfig {
    /// Enable the background refresher. When disabled every
    /// `getCurrentBlock` goes to the explorer.
    pub enabled: bool,

    /// Refresh interval in seconds. Readers may see a block this stale.
    pub refresh_interval_secs: u64,
}

impl Default for BlockCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            refresh_interval_secs: 30,
        }
    }
}

/// Timeout configuration for the HTTP layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 90 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
