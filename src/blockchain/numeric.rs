//! Conversion between hexadecimal, decimal and canonical integer strings.
//!
//! The canonical form is base-10 with no leading zeros (`"0"` for zero).
//! Values are parsed into a 256-bit unsigned integer, which covers every
//! amount, balance and gas quantity an EVM chain can produce.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blockchain::types::{GatewayError, GatewayResult};

/// Encoding of a source integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    Decimal,
    /// `0x`-prefixed.
    Hexadecimal,
}

impl Encoding {
    /// Guess the encoding from the `0x` prefix.
    pub fn of(value: &str) -> Self {
        if value.starts_with("0x") || value.starts_with("0X") {
            Encoding::Hexadecimal
        } else {
            Encoding::Decimal
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Decimal => write!(f, "decimal"),
            Encoding::Hexadecimal => write!(f, "hexadecimal"),
        }
    }
}

/// Parse an integer literal in the declared encoding.
pub fn parse(value: &str, encoding: Encoding) -> GatewayResult<U256> {
    let malformed = || GatewayError::MalformedNumericInput {
        value: value.to_string(),
        encoding,
    };

    let (digits, radix) = match encoding {
        Encoding::Decimal => (value, 10),
        Encoding::Hexadecimal => (
            value
                .strip_prefix("0x")
                .or_else(|| value.strip_prefix("0X"))
                .ok_or_else(malformed)?,
            16,
        ),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix as u32)) {
        return Err(malformed());
    }

    U256::from_str_radix(digits, radix).map_err(|_| malformed())
}

/// Convert a literal to the canonical decimal string.
pub fn to_canonical(value: &str, encoding: Encoding) -> GatewayResult<String> {
    parse(value, encoding).map(|n| n.to_string())
}

/// Like [`to_canonical`], taking the encoding from the literal's prefix.
pub fn canonical(value: &str) -> GatewayResult<String> {
    to_canonical(value, Encoding::of(value))
}

/// Convert a literal to lower-case hex without the `0x` prefix.
///
/// Nonces are kept in this form rather than canonical decimal.
pub fn to_nonce_hex(value: &str, encoding: Encoding) -> GatewayResult<String> {
    parse(value, encoding).map(|n| format!("{:x}", n))
}

/// Parse a small counter such as a confirmation count or receipt status.
pub fn to_u64(value: &str) -> GatewayResult<u64> {
    let encoding = Encoding::of(value);
    let n = parse(value, encoding)?;
    u64::try_from(n).map_err(|_| GatewayError::MalformedNumericInput {
        value: value.to_string(),
        encoding,
    })
}
