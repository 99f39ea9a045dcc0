//! Transaction record types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::numeric::Encoding;

/// Errors that can occur while serving a provider call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Timeout, non-2xx response or transport failure on an upstream call.
    #[error("{api} unavailable: {message}")]
    UpstreamUnavailable { api: &'static str, message: String },

    /// The node answered with a JSON-RPC error object.
    #[error("{message}, used params for RPC call {method}: {params}")]
    Rpc {
        message: String,
        method: String,
        params: String,
    },

    /// A numeric field is not a valid integer literal in its declared encoding.
    #[error("malformed {encoding} integer: {value:?}")]
    MalformedNumericInput { value: String, encoding: Encoding },

    /// An upstream payload did not have the expected shape.
    #[error("malformed {api} response: {message}")]
    MalformedResponse { api: &'static str, message: String },

    /// The explorer has no record for this hash.
    #[error("transaction {0} not found")]
    TransactionNotFound(String),

    /// A transfer or internal call referenced a parent that could not be resolved.
    #[error("could not synthesize parent transaction {hash}")]
    SynthesisIncomplete { hash: String },

    /// No provider registered under this name.
    #[error("provider '{0}' not found")]
    UnknownProvider(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Chain head as reported by a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Canonical decimal height.
    pub height: String,
    /// Empty when the source cannot supply it.
    pub hash: String,
}

/// Block reference carried on a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub number: Option<String>,
    pub hash: Option<String>,
}

/// One token-transfer event attributed to a parent transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Transfer {
    pub from: Option<String>,
    pub to: Option<String>,
    pub contract_address: Option<String>,
    pub value: Option<String>,
}

/// One internal message call attributed to a parent transaction.
///
/// Entries built from an unmatched token transfer (see
/// [`UnmatchedTransferPolicy::InternalCalls`]) carry `contract_address` and
/// leave the gas fields empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalCall {
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    /// Gas allotted to the call (the explorer's `gas` field).
    pub gas_price: Option<String>,
    pub gas_used: Option<String>,
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

impl From<Erc20Transfer> for InternalCall {
    fn from(transfer: Erc20Transfer) -> Self {
        Self {
            from: transfer.from,
            to: transfer.to,
            value: transfer.value,
            contract_address: transfer.contract_address,
            ..Self::default()
        }
    }
}

/// A unified transaction record, keyed by its lower-case hash.
///
/// Every field except `hash` may be absent: synthesized parents only carry
/// what a single-transaction lookup could recover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub gas_price: Option<String>,
    pub gas_limit: Option<String>,
    pub gas_used: Option<String>,
    /// Hex without `0x`, kept for broadcast compatibility.
    pub nonce: Option<String>,
    pub block: BlockRef,
    pub confirmations: Option<u64>,
    pub input: Option<String>,
    pub status: Option<u8>,
    /// ISO-8601, second precision.
    pub received_at: Option<String>,
    pub erc20_transfers: Vec<Erc20Transfer>,
    pub internal_calls: Vec<InternalCall>,
}

/// Where a token transfer whose parent had to be synthesized gets filed.
///
/// The service has historically filed these under the parent's internal
/// calls. Which collection consumers expect is unresolved, so the choice is
/// configuration rather than code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedTransferPolicy {
    /// Legacy behaviour: attach as an internal call.
    #[default]
    InternalCalls,
    /// Attach as a token transfer like matched transfers are.
    Erc20Transfers,
}
