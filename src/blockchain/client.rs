//! JSON-RPC node client.
//!
//! # Responsibilities
//! - Issue single JSON-RPC 2.0 round trips against one authenticated endpoint
//! - Enforce the per-call timeout
//! - Surface node error objects as [`GatewayError::Rpc`]
//! - Log and meter every call
//!
//! No retries: failures propagate to the caller unchanged.

use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::blockchain::numeric::{self, Encoding};
use crate::blockchain::types::{GatewayError, GatewayResult};
use crate::config::RpcConfig;
use crate::observability::{logging, metrics};

const API: &str = "rpc";

/// Request id sent with every call.
const REQUEST_ID: &str = "0";

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    message: String,
}

/// Client for the JSON-RPC node.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    version: String,
    timeout: Duration,
}

impl RpcClient {
    /// Create a new client from configuration.
    pub fn new(config: &RpcConfig) -> GatewayResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::UpstreamUnavailable {
                api: API,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            version: config.version.clone(),
            timeout,
        })
    }

    /// Perform one JSON-RPC call and return its `result`.
    ///
    /// A `null` result with no error object is returned as `Value::Null`.
    pub async fn call(&self, method: &str, params: Value) -> GatewayResult<Value> {
        let start = Instant::now();
        let body = json!({
            "jsonrpc": self.version,
            "method": method,
            "params": params,
            "id": REQUEST_ID,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(method, e, start))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(method, e, start))?;

        if !status.is_success() {
            let message = logging::concise_error(&text).unwrap_or_else(|| status.to_string());
            return Err(self.failure(method, message, start));
        }

        logging::log_upstream_call(API, &self.endpoint, method, status.as_u16(), start);
        metrics::record_upstream(API, "ok", start);

        let parsed: RpcResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::MalformedResponse {
                api: API,
                message: format!("{}: {}", method, e),
            })?;

        match (parsed.result, parsed.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(GatewayError::Rpc {
                message: error.message,
                method: method.to_string(),
                params: params.to_string(),
            }),
            (None, None) => Ok(Value::Null),
        }
    }

    /// Call a method whose result is a hex quantity and return it canonical.
    pub async fn call_quantity(&self, method: &str, params: Value) -> GatewayResult<String> {
        match self.call(method, params).await? {
            Value::String(hex) => numeric::to_canonical(&hex, Encoding::Hexadecimal),
            other => Err(GatewayError::MalformedResponse {
                api: API,
                message: format!("{} returned {} instead of a quantity", method, other),
            }),
        }
    }

    fn transport_error(&self, method: &str, error: reqwest::Error, start: Instant) -> GatewayError {
        let message = if error.is_timeout() {
            format!("timeout after {} seconds", self.timeout.as_secs())
        } else {
            error.to_string()
        };
        self.failure(method, message, start)
    }

    fn failure(&self, method: &str, message: String, start: Instant) -> GatewayError {
        logging::log_upstream_error(API, &self.endpoint, method, &message, start);
        metrics::record_upstream(API, "error", start);
        GatewayError::UpstreamUnavailable { api: API, message }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The token is a credential; keep it out of logs.
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .field("version", &self.version)
            .field("timeout_secs", &self.timeout.as_secs())
            .finish()
    }
}
