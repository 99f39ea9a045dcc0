//! Provider backed by the Blockscout explorer API and a JSON-RPC node.
//!
//! The explorer serves balances, history and single transactions; the node
//! serves what the explorer lacks (nonce, gas price, gas estimate, broadcast)
//! and backfills single-transaction lookups.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::blockchain::client::RpcClient;
use crate::blockchain::types::{
    Block, GatewayError, GatewayResult, Transaction, UnmatchedTransferPolicy,
};
use crate::config::schema::{BlockCacheConfig, GatewayConfig};
use crate::explorer::client::{BlockSource, ExplorerClient};
use crate::explorer::raw::{RawInternalTransaction, RawTokenTransfer, RawTransaction};
use crate::providers::block_cache::{spawn_refresher, BlockCache};
use crate::providers::lookup::TransactionLookup;
use crate::providers::Provider;
use crate::reconcile::Reconciler;

pub struct BlockscoutProvider {
    explorer: ExplorerClient,
    rpc: RpcClient,
    lookup: TransactionLookup,
    block_cache: Arc<BlockCache>,
    cache_config: BlockCacheConfig,
    policy: UnmatchedTransferPolicy,
}

impl BlockscoutProvider {
    pub fn new(
        explorer: ExplorerClient,
        rpc: RpcClient,
        cache_config: BlockCacheConfig,
        policy: UnmatchedTransferPolicy,
    ) -> Self {
        Self {
            lookup: TransactionLookup::new(explorer.clone(), rpc.clone()),
            explorer,
            rpc,
            block_cache: Arc::new(BlockCache::new()),
            cache_config,
            policy,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        Ok(Self::new(
            ExplorerClient::new(&config.explorer)?,
            RpcClient::new(&config.rpc)?,
            config.block_cache.clone(),
            config.provider.unmatched_transfer_policy,
        ))
    }

    /// Shared current-block slot.
    pub fn block_cache(&self) -> Arc<BlockCache> {
        self.block_cache.clone()
    }
}

#[async_trait]
impl Provider for BlockscoutProvider {
    fn init(&self, shutdown: broadcast::Receiver<()>) {
        if !self.cache_config.enabled {
            tracing::info!("Block cache disabled, current block is fetched per request");
            return;
        }
        spawn_refresher(
            self.block_cache.clone(),
            self.explorer.clone(),
            Duration::from_secs(self.cache_config.refresh_interval_secs),
            shutdown,
        );
    }

    async fn get_current_block(&self) -> GatewayResult<Block> {
        if let Some(block) = self.block_cache.get() {
            return Ok(Block::clone(&block));
        }
        self.explorer.current_block().await
    }

    async fn get_account_balance(&self, address: &str) -> GatewayResult<String> {
        self.explorer.account_balance(address).await
    }

    async fn get_account_token_balance(&self, address: &str, token: &str) -> GatewayResult<String> {
        self.explorer.account_token_balance(address, token).await
    }

    async fn get_account_nonce(&self, address: &str) -> GatewayResult<String> {
        self.rpc
            .call_quantity("eth_getTransactionCount", json!([address, "latest"]))
            .await
    }

    async fn get_account_transactions(&self, address: &str) -> GatewayResult<Vec<Transaction>> {
        let (txs, transfers, calls) = tokio::try_join!(
            self.explorer.account_transaction_list(address),
            self.explorer.account_token_transfer_list(address),
            self.explorer.account_internal_transaction_list(address),
        )?;

        tracing::debug!(
            address,
            transactions = txs.len(),
            transfers = transfers.len(),
            internal_calls = calls.len(),
            "Fetched account collections"
        );

        let base = txs
            .into_iter()
            .map(RawTransaction::into_transaction)
            .collect::<GatewayResult<Vec<_>>>()?;
        let transfers = transfers
            .into_iter()
            .map(RawTokenTransfer::into_parented)
            .collect::<GatewayResult<Vec<_>>>()?;
        let calls = calls
            .into_iter()
            .map(RawInternalTransaction::into_parented)
            .collect::<GatewayResult<Vec<_>>>()?;

        Reconciler::new(&self.lookup, self.policy)
            .reconcile(base, transfers, calls)
            .await
    }

    async fn get_gas_price(&self) -> GatewayResult<String> {
        self.rpc.call_quantity("eth_gasPrice", json!([])).await
    }

    async fn get_estimated_gas_limit(
        &self,
        from: &str,
        to: &str,
        input: &str,
    ) -> GatewayResult<String> {
        self.rpc
            .call_quantity("eth_estimateGas", json!([{ "from": from, "to": to, "data": input }]))
            .await
    }

    async fn get_transaction_by_hash(&self, hash: &str) -> GatewayResult<Transaction> {
        self.lookup.transaction_by_hash(hash).await
    }

    async fn push_raw_transaction(&self, raw_tx: &str) -> GatewayResult<String> {
        match self.rpc.call("eth_sendRawTransaction", json!([raw_tx])).await? {
            Value::String(hash) => Ok(hash),
            other => Err(GatewayError::MalformedResponse {
                api: "rpc",
                message: format!("eth_sendRawTransaction returned {}", other),
            }),
        }
    }
}
