//! Request identification and path input validation.
//!
//! # Responsibilities
//! - Generate a UUID v4 request id when the client did not send one
//! - Parse path and body inputs (addresses, hashes, hex payloads) before
//!   anything reaches the provider
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Inputs are normalized to lower-case `0x` hex

use alloy::primitives::{Address, Bytes, TxHash};
use axum::http::{HeaderName, HeaderValue, Request};
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::ApiError;

/// Header carrying the request id in both directions.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request id generator backed by UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request id of an inbound request, or `unknown`.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

fn require_prefix<'a>(value: &'a str, what: &str) -> Result<&'a str, ApiError> {
    if value.starts_with("0x") || value.starts_with("0X") {
        Ok(value)
    } else {
        Err(ApiError::BadRequest(format!("invalid {}: {:?} is not 0x-prefixed hex", what, value)))
    }
}

/// A 20-byte account or contract address.
pub fn parse_address(value: &str) -> Result<String, ApiError> {
    let value = require_prefix(value, "address")?;
    Address::from_str(value)
        .map(|a| a.to_string().to_lowercase())
        .map_err(|e| ApiError::BadRequest(format!("invalid address {:?}: {}", value, e)))
}

/// A 32-byte transaction hash.
pub fn parse_hash(value: &str) -> Result<String, ApiError> {
    let value = require_prefix(value, "transaction hash")?;
    TxHash::from_str(value)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::BadRequest(format!("invalid transaction hash {:?}: {}", value, e)))
}

/// Arbitrary hex data such as call input or a signed transaction.
pub fn parse_hex_data(value: &str, what: &str) -> Result<String, ApiError> {
    let value = require_prefix(value, what)?;
    Bytes::from_str(value)
        .map(|b| b.to_string())
        .map_err(|e| ApiError::BadRequest(format!("invalid {} {:?}: {}", what, value, e)))
}
