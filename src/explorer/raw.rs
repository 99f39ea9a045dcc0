//! Raw explorer payloads and their conversion into transaction records.
//!
//! Every field is optional until parsed. Explorer values may arrive as JSON
//! strings or numbers and numeric strings may be decimal or `0x` hex; both
//! are accepted and normalized here.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::blockchain::numeric::{self, Encoding};
use crate::blockchain::types::{
    BlockRef, Erc20Transfer, GatewayError, GatewayResult, InternalCall, Transaction,
};

const API: &str = "explorer";

/// Accept a string, number or boolean; treat `null` and `""` as absent.
fn lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// A transaction as returned by `txlist`, `gettxinfo`, or a node's
/// `eth_getTransactionByHash`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(deserialize_with = "lenient")]
    pub hash: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub from: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub to: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub gas_price: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub gas: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub gas_limit: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub gas_used: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub nonce: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub block_number: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub block_hash: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub confirmations: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub input: Option<String>,
    #[serde(rename = "txreceipt_status", deserialize_with = "lenient")]
    pub receipt_status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub success: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub time_stamp: Option<String>,
}

/// A token-transfer event as returned by `tokentx`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTokenTransfer {
    #[serde(deserialize_with = "lenient")]
    pub hash: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub from: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub to: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub contract_address: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub value: Option<String>,
}

/// An internal call as returned by `txlistinternal`.
///
/// The parent is named by `transactionHash`, not `hash`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawInternalTransaction {
    #[serde(deserialize_with = "lenient")]
    pub transaction_hash: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub from: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub to: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub gas: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub gas_used: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub input: Option<String>,
}

/// A token transfer tagged with the hash of the transaction that emitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentedTransfer {
    pub parent_hash: String,
    pub transfer: Erc20Transfer,
}

/// An internal call tagged with the hash of its enclosing transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentedCall {
    pub parent_hash: String,
    pub call: InternalCall,
}

fn canonical(field: Option<String>) -> GatewayResult<Option<String>> {
    field.map(|v| numeric::canonical(&v)).transpose()
}

fn required_hash(field: Option<String>, what: &str) -> GatewayResult<String> {
    field
        .map(|h| h.to_lowercase())
        .ok_or_else(|| GatewayError::MalformedResponse {
            api: API,
            message: format!("{} without a transaction hash", what),
        })
}

/// Format explorer Unix seconds as ISO-8601 with no sub-second component.
pub fn received_at(time_stamp: &str) -> GatewayResult<String> {
    let secs = numeric::to_u64(time_stamp)?;
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| GatewayError::MalformedResponse {
            api: API,
            message: format!("timestamp {} out of range", time_stamp),
        })
}

/// A receipt status is `0` (reverted) or `1` (succeeded).
fn receipt_status(value: &str) -> GatewayResult<u8> {
    match numeric::to_u64(value)? {
        0 => Ok(0),
        1 => Ok(1),
        other => Err(GatewayError::MalformedResponse {
            api: API,
            message: format!("receipt status {} is neither 0 nor 1", other),
        }),
    }
}

impl RawTransaction {
    /// Names of the fields a node lookup can fill in that are absent here.
    pub fn missing_node_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gas_price.is_none() {
            missing.push("gasPrice");
        }
        if self.nonce.is_none() {
            missing.push("nonce");
        }
        if self.block_hash.is_none() {
            missing.push("blockHash");
        }
        missing
    }

    /// Fill gas price, nonce and block hash from a node's view of the same
    /// transaction, where the node has them.
    pub fn overlay_node_fields(&mut self, node: RawTransaction) {
        if node.gas_price.is_some() {
            self.gas_price = node.gas_price;
        }
        if node.nonce.is_some() {
            self.nonce = node.nonce;
        }
        if node.block_hash.is_some() {
            self.block_hash = node.block_hash;
        }
    }

    /// Validate and normalize into a [`Transaction`] with empty sub-collections.
    pub fn into_transaction(self) -> GatewayResult<Transaction> {
        let status = match (self.success.as_deref(), self.receipt_status) {
            (Some("true"), _) => Some(1),
            (Some("false"), _) => Some(0),
            (_, Some(status)) => Some(receipt_status(&status)?),
            _ => None,
        };

        Ok(Transaction {
            hash: required_hash(self.hash, "transaction")?,
            from: self.from,
            to: self.to,
            value: canonical(self.value)?,
            gas_price: canonical(self.gas_price)?,
            gas_limit: canonical(self.gas_limit.or(self.gas))?,
            gas_used: canonical(self.gas_used)?,
            nonce: self
                .nonce
                .map(|n| numeric::to_nonce_hex(&n, Encoding::of(&n)))
                .transpose()?,
            block: BlockRef {
                number: canonical(self.block_number)?,
                hash: self.block_hash,
            },
            confirmations: self.confirmations.map(|c| numeric::to_u64(&c)).transpose()?,
            input: self.input,
            status,
            received_at: self.time_stamp.map(|t| received_at(&t)).transpose()?,
            erc20_transfers: Vec::new(),
            internal_calls: Vec::new(),
        })
    }
}

impl RawTokenTransfer {
    pub fn into_parented(self) -> GatewayResult<ParentedTransfer> {
        Ok(ParentedTransfer {
            parent_hash: required_hash(self.hash, "token transfer")?,
            transfer: Erc20Transfer {
                from: self.from,
                to: self.to,
                contract_address: self.contract_address,
                value: canonical(self.value)?,
            },
        })
    }
}

impl RawInternalTransaction {
    pub fn into_parented(self) -> GatewayResult<ParentedCall> {
        Ok(ParentedCall {
            parent_hash: required_hash(self.transaction_hash, "internal call")?,
            call: InternalCall {
                from: self.from,
                to: self.to,
                value: canonical(self.value)?,
                gas_price: canonical(self.gas)?,
                gas_used: canonical(self.gas_used)?,
                input: self.input,
                contract_address: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txlist_entry() -> Value {
        json!({
            "blockHash": "0x373d339e45a701447367d7b9c7cef84aab79c2b2714271b908cda0ab3ad0849b",
            "blockNumber": "65204",
            "confirmations": "5994246",
            "contractAddress": "",
            "cumulativeGasUsed": "122207",
            "from": "0x3fb1cd2cd96c6d5c0b5eb3322d807b34482481d4",
            "gas": "122261",
            "gasPrice": "50000000000",
            "gasUsed": "122207",
            "hash": "0x98BEB27135AA0A25650557005AD962919D6A278C4B3DDE7F4F6A3A1E65AA746C",
            "input": "0xf00d4b5d",
            "isError": "0",
            "nonce": "26",
            "timeStamp": "1439232889",
            "to": "0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae",
            "transactionIndex": "0",
            "txreceipt_status": "1",
            "value": "0"
        })
    }

    #[test]
    fn test_txlist_entry_normalization() {
        let raw: RawTransaction = serde_json::from_value(txlist_entry()).unwrap();
        let tx = raw.into_transaction().unwrap();

        assert_eq!(tx.hash, "0x98beb27135aa0a25650557005ad962919d6a278c4b3dde7f4f6a3a1e65aa746c");
        assert_eq!(tx.value.as_deref(), Some("0"));
        assert_eq!(tx.gas_price.as_deref(), Some("50000000000"));
        assert_eq!(tx.gas_limit.as_deref(), Some("122261"));
        assert_eq!(tx.nonce.as_deref(), Some("1a"));
        assert_eq!(tx.block.number.as_deref(), Some("65204"));
        assert_eq!(tx.confirmations, Some(5994246));
        assert_eq!(tx.status, Some(1));
        assert_eq!(tx.received_at.as_deref(), Some("2015-08-10T18:54:49Z"));
        assert!(tx.erc20_transfers.is_empty());
        assert!(tx.internal_calls.is_empty());
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "hash": "0xab",
            "to": "",
            "value": null
        }))
        .unwrap();
        let tx = raw.into_transaction().unwrap();
        assert_eq!(tx.to, None);
        assert_eq!(tx.value, None);
        assert_eq!(tx.nonce, None);
        assert_eq!(tx.status, None);
    }

    #[test]
    fn test_numbers_accepted_as_json_numbers() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "hash": "0xab",
            "confirmations": 12,
            "success": true
        }))
        .unwrap();
        let tx = raw.into_transaction().unwrap();
        assert_eq!(tx.confirmations, Some(12));
        assert_eq!(tx.status, Some(1));
    }

    #[test]
    fn test_receipt_status_out_of_range_is_rejected() {
        for status in ["2", "256", "257"] {
            let raw: RawTransaction = serde_json::from_value(json!({
                "hash": "0xab",
                "txreceipt_status": status
            }))
            .unwrap();
            assert!(
                matches!(
                    raw.into_transaction(),
                    Err(GatewayError::MalformedResponse { api: "explorer", .. })
                ),
                "status {}",
                status
            );
        }

        let raw: RawTransaction =
            serde_json::from_value(json!({ "hash": "0xab", "txreceipt_status": "0x0" })).unwrap();
        assert_eq!(raw.into_transaction().unwrap().status, Some(0));
    }

    #[test]
    fn test_missing_hash_is_rejected() {
        let raw: RawTransaction = serde_json::from_value(json!({ "value": "1" })).unwrap();
        assert!(matches!(
            raw.into_transaction(),
            Err(GatewayError::MalformedResponse { api: "explorer", .. })
        ));
    }

    #[test]
    fn test_malformed_value_is_rejected() {
        let raw: RawTransaction =
            serde_json::from_value(json!({ "hash": "0xab", "value": "12abc" })).unwrap();
        assert!(matches!(
            raw.into_transaction(),
            Err(GatewayError::MalformedNumericInput { .. })
        ));
    }

    #[test]
    fn test_missing_node_fields() {
        let mut raw: RawTransaction = serde_json::from_value(json!({
            "hash": "0xab",
            "gasPrice": "1"
        }))
        .unwrap();
        assert_eq!(raw.missing_node_fields(), vec!["nonce", "blockHash"]);

        let node: RawTransaction = serde_json::from_value(json!({
            "hash": "0xab",
            "gasPrice": "0x2",
            "nonce": "0x10",
            "blockHash": "0xbb"
        }))
        .unwrap();
        raw.overlay_node_fields(node);
        assert!(raw.missing_node_fields().is_empty());

        let tx = raw.into_transaction().unwrap();
        assert_eq!(tx.gas_price.as_deref(), Some("2"));
        assert_eq!(tx.nonce.as_deref(), Some("10"));
        assert_eq!(tx.block.hash.as_deref(), Some("0xbb"));
    }

    #[test]
    fn test_complete_record_needs_no_node() {
        let raw: RawTransaction = serde_json::from_value(txlist_entry()).unwrap();
        assert!(raw.missing_node_fields().is_empty());
    }

    #[test]
    fn test_internal_call_uses_transaction_hash() {
        let raw: RawInternalTransaction = serde_json::from_value(json!({
            "blockNumber": "2535368",
            "hash": "0xshouldbeignored",
            "transactionHash": "0x8A1A9989BDA84F80143181A68BC137ECEFA64D0D4EBDE45DD94FC0CF49E70CB6",
            "from": "0x20d42f2e99a421147acf198d775395cac2e8b03d",
            "to": "",
            "value": "0x1",
            "gas": "254791",
            "gasUsed": "46750",
            "input": ""
        }))
        .unwrap();
        let parented = raw.into_parented().unwrap();
        assert_eq!(
            parented.parent_hash,
            "0x8a1a9989bda84f80143181a68bc137ecefa64d0d4ebde45dd94fc0cf49e70cb6"
        );
        assert_eq!(parented.call.value.as_deref(), Some("1"));
        assert_eq!(parented.call.gas_price.as_deref(), Some("254791"));
        assert_eq!(parented.call.to, None);
    }

    #[test]
    fn test_token_transfer() {
        let raw: RawTokenTransfer = serde_json::from_value(json!({
            "hash": "0xB",
            "contractAddress": "0xC",
            "value": "5",
            "tokenSymbol": "TKN"
        }))
        .unwrap();
        let parented = raw.into_parented().unwrap();
        assert_eq!(parented.parent_hash, "0xb");
        assert_eq!(parented.transfer.contract_address.as_deref(), Some("0xC"));
        assert_eq!(parented.transfer.value.as_deref(), Some("5"));
    }

    #[test]
    fn test_received_at_drops_subseconds() {
        assert_eq!(received_at("0").unwrap(), "1970-01-01T00:00:00Z");
        assert!(received_at("soon").is_err());
    }
}
