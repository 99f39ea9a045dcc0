//! Block explorer read API client.
//!
//! # Responsibilities
//! - Issue `module`/`action` GET queries against one base endpoint
//! - Interpret the `{status, message, result}` envelope per action
//! - Log and meter every call, including the upstream's error message
//!
//! No retries: failures propagate to the caller unchanged.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::blockchain::numeric;
use crate::blockchain::types::{Block, GatewayError, GatewayResult};
use crate::config::ExplorerConfig;
use crate::explorer::raw::{RawInternalTransaction, RawTokenTransfer, RawTransaction};
use crate::observability::{logging, metrics};

const API: &str = "explorer";

/// Response envelope shared by every explorer action.
///
/// The `eth_*` proxy actions answer in JSON-RPC shape instead, without a
/// `status` and possibly with an `error`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub status: Option<String>,
    pub message: Option<String>,
    pub result: Value,
    pub error: Option<Value>,
}

impl Envelope {
    fn is_error(&self) -> bool {
        self.status.as_deref() == Some("0") || self.error.is_some()
    }

    fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(obj)) => obj
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
            _ => self
                .message
                .clone()
                .or_else(|| self.result.as_str().map(str::to_string))
                .unwrap_or_else(|| "unknown error".to_string()),
        }
    }
}

/// Source of the chain head.
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn current_block(&self) -> GatewayResult<Block>;
}

/// Client for the explorer read API.
#[derive(Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ExplorerClient {
    /// Create a new client from configuration.
    pub fn new(config: &ExplorerConfig) -> GatewayResult<Self> {
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
            base_url: config.base_url.clone(),
            timeout,
        })
    }

    /// Balance of an account in wei, canonical decimal.
    pub async fn account_balance(&self, address: &str) -> GatewayResult<String> {
        let envelope = self
            .get(&[("module", "account"), ("action", "eth_get_balance"), ("address", address)])
            .await?;
        self.scalar(envelope, "eth_get_balance")
    }

    /// Token balance of an account for one contract, canonical decimal.
    pub async fn account_token_balance(
        &self,
        address: &str,
        contract: &str,
    ) -> GatewayResult<String> {
        let envelope = self
            .get(&[
                ("module", "account"),
                ("action", "tokenbalance"),
                ("contractaddress", contract),
                ("address", address),
            ])
            .await?;
        self.scalar(envelope, "tokenbalance")
    }

    /// Plain transactions sent from or to an account.
    pub async fn account_transaction_list(
        &self,
        address: &str,
    ) -> GatewayResult<Vec<RawTransaction>> {
        self.list("txlist", address).await
    }

    /// Token-transfer events involving an account.
    pub async fn account_token_transfer_list(
        &self,
        address: &str,
    ) -> GatewayResult<Vec<RawTokenTransfer>> {
        self.list("tokentx", address).await
    }

    /// Internal calls involving an account.
    pub async fn account_internal_transaction_list(
        &self,
        address: &str,
    ) -> GatewayResult<Vec<RawInternalTransaction>> {
        self.list("txlistinternal", address).await
    }

    /// One transaction by hash, or `None` when the explorer has no record.
    pub async fn transaction_by_hash(&self, hash: &str) -> GatewayResult<Option<RawTransaction>> {
        let envelope = self
            .get(&[("module", "transaction"), ("action", "gettxinfo"), ("txhash", hash)])
            .await?;

        if envelope.result.is_null() {
            if envelope.is_error() || envelope.status.is_none() {
                return Ok(None);
            }
            return Err(GatewayError::MalformedResponse {
                api: API,
                message: "gettxinfo returned no result".to_string(),
            });
        }
        if envelope.is_error() {
            return Err(self.envelope_error("gettxinfo", &envelope));
        }

        Self::decode("gettxinfo", envelope.result).map(Some)
    }

    async fn get(&self, params: &[(&str, &str)]) -> GatewayResult<Envelope> {
        let start = Instant::now();
        let action = params
            .iter()
            .find(|(k, _)| *k == "action")
            .map(|(_, v)| *v)
            .unwrap_or("");

        let response = self
            .http
            .get(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(action, e, start))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(action, e, start))?;

        if !status.is_success() {
            let message = logging::concise_error(&text).unwrap_or_else(|| status.to_string());
            return Err(self.failure(action, message, start));
        }

        logging::log_upstream_call(API, &self.base_url, action, status.as_u16(), start);
        metrics::record_upstream(API, "ok", start);

        serde_json::from_str(&text).map_err(|e| GatewayError::MalformedResponse {
            api: API,
            message: format!("{}: {}", action, e),
        })
    }

    async fn list<T: DeserializeOwned>(
        &self,
        action: &str,
        address: &str,
    ) -> GatewayResult<Vec<T>> {
        let envelope = self
            .get(&[("module", "account"), ("action", action), ("address", address)])
            .await?;

        // An account with no history answers status "0" with an empty array.
        if envelope.result.is_array() {
            return Self::decode(action, envelope.result);
        }
        if envelope.is_error() {
            return Err(self.envelope_error(action, &envelope));
        }
        if envelope.result.is_null() {
            return Ok(Vec::new());
        }
        Err(GatewayError::MalformedResponse {
            api: API,
            message: format!("{} returned {} instead of a list", action, envelope.result),
        })
    }

    fn scalar(&self, envelope: Envelope, action: &str) -> GatewayResult<String> {
        if envelope.is_error() {
            return Err(self.envelope_error(action, &envelope));
        }
        match &envelope.result {
            Value::String(s) => numeric::canonical(s),
            Value::Number(n) => numeric::canonical(&n.to_string()),
            other => Err(GatewayError::MalformedResponse {
                api: API,
                message: format!("{} returned {} instead of an integer", action, other),
            }),
        }
    }

    fn decode<T: DeserializeOwned>(action: &str, value: Value) -> GatewayResult<T> {
        serde_json::from_value(value).map_err(|e| GatewayError::MalformedResponse {
            api: API,
            message: format!("{}: {}", action, e),
        })
    }

    fn envelope_error(&self, action: &str, envelope: &Envelope) -> GatewayError {
        let message = envelope.error_message();
        tracing::warn!(api = API, action, error = %message, "Explorer reported an error");
        GatewayError::UpstreamUnavailable { api: API, message }
    }

    fn transport_error(&self, action: &str, error: reqwest::Error, start: Instant) -> GatewayError {
        let message = if error.is_timeout() {
            format!("timeout after {} seconds", self.timeout.as_secs())
        } else {
            error.to_string()
        };
        self.failure(action, message, start)
    }

    fn failure(&self, action: &str, message: String, start: Instant) -> GatewayError {
        logging::log_upstream_error(API, &self.base_url, action, &message, start);
        metrics::record_upstream(API, "error", start);
        GatewayError::UpstreamUnavailable { api: API, message }
    }
}

#[async_trait]
impl BlockSource for ExplorerClient {
    /// Chain head from `eth_block_number`. The explorer does not return a
    /// block hash here, so it is left empty.
    async fn current_block(&self) -> GatewayResult<Block> {
        let envelope = self
            .get(&[("module", "block"), ("action", "eth_block_number")])
            .await?;
        Ok(Block {
            height: self.scalar(envelope, "eth_block_number")?,
            hash: String::new(),
        })
    }
}

impl std::fmt::Debug for ExplorerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerClient")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout.as_secs())
            .finish()
    }
}
