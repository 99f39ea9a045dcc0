//! Single-transaction lookup with node backfill.

use async_trait::async_trait;
use serde_json::json;

use crate::blockchain::client::RpcClient;
use crate::blockchain::types::{GatewayError, GatewayResult, Transaction};
use crate::explorer::client::ExplorerClient;
use crate::explorer::raw::RawTransaction;
use crate::reconcile::ParentResolver;

/// Resolves one transaction from the explorer, filling gas price, nonce and
/// block hash from the node when the explorer record lacks any of them.
#[derive(Debug, Clone)]
pub struct TransactionLookup {
    explorer: ExplorerClient,
    rpc: RpcClient,
}

impl TransactionLookup {
    pub fn new(explorer: ExplorerClient, rpc: RpcClient) -> Self {
        Self { explorer, rpc }
    }

    /// Look a transaction up by hash. Sub-collections are always empty.
    pub async fn transaction_by_hash(&self, hash: &str) -> GatewayResult<Transaction> {
        let hash = hash.to_lowercase();
        let mut raw = self
            .explorer
            .transaction_by_hash(&hash)
            .await?
            .ok_or_else(|| GatewayError::TransactionNotFound(hash.clone()))?;

        let missing = raw.missing_node_fields();
        if !missing.is_empty() {
            tracing::debug!(hash = %hash, missing = ?missing, "Backfilling transaction from node");
            let node = self
                .rpc
                .call("eth_getTransactionByHash", json!([hash]))
                .await?;
            let node: Option<RawTransaction> =
                serde_json::from_value(node).map_err(|e| GatewayError::MalformedResponse {
                    api: "rpc",
                    message: format!("eth_getTransactionByHash: {}", e),
                })?;
            match node {
                Some(node) => raw.overlay_node_fields(node),
                None => tracing::debug!(hash = %hash, "Node has no record of transaction"),
            }
        }

        if raw.hash.is_none() {
            raw.hash = Some(hash);
        }
        raw.into_transaction()
    }
}

#[async_trait]
impl ParentResolver for TransactionLookup {
    async fn resolve(&self, hash: &str) -> GatewayResult<Transaction> {
        self.transaction_by_hash(hash).await
    }
}
