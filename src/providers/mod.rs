//! Provider facade and registry.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → Provider (capability trait)
//!     → blockscout.rs
//!         → explorer client (balances, history, single transactions)
//!         → rpc client (nonce, gas, broadcast, lookup backfill)
//!         → reconciler (account history merge)
//!         → block_cache.rs (optional current-block slot)
//! ```

pub mod block_cache;
pub mod blockscout;
pub mod lookup;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::blockchain::types::{Block, GatewayError, GatewayResult, Transaction};
use crate::config::GatewayConfig;

pub use block_cache::BlockCache;
pub use blockscout::BlockscoutProvider;
pub use lookup::TransactionLookup;

/// Capabilities exposed to the HTTP layer.
///
/// Amounts, balances and gas values are canonical decimal strings.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Start background work. Runs until `shutdown` fires.
    fn init(&self, _shutdown: broadcast::Receiver<()>) {}

    async fn get_current_block(&self) -> GatewayResult<Block>;

    async fn get_account_balance(&self, address: &str) -> GatewayResult<String>;

    async fn get_account_token_balance(&self, address: &str, token: &str) -> GatewayResult<String>;

    /// Transaction count, canonical decimal.
    async fn get_account_nonce(&self, address: &str) -> GatewayResult<String>;

    /// Every transaction touching the account, with token transfers and
    /// internal calls attached. Order is unspecified.
    async fn get_account_transactions(&self, address: &str) -> GatewayResult<Vec<Transaction>>;

    async fn get_gas_price(&self) -> GatewayResult<String>;

    async fn get_estimated_gas_limit(&self, from: &str, to: &str, input: &str)
        -> GatewayResult<String>;

    /// A single transaction with empty sub-collections.
    async fn get_transaction_by_hash(&self, hash: &str) -> GatewayResult<Transaction>;

    /// Broadcast a signed transaction; returns the node's result (the hash).
    async fn push_raw_transaction(&self, raw_tx: &str) -> GatewayResult<String>;
}

/// Build the provider named in the configuration.
pub fn select_provider(config: &GatewayConfig) -> GatewayResult<Arc<dyn Provider>> {
    match config.provider.name.as_str() {
        "blockscout" => Ok(Arc::new(BlockscoutProvider::from_config(config)?)),
        other => Err(GatewayError::UnknownProvider(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.provider.name = name.to_string();
        config.rpc.endpoint = "http://localhost:8545".to_string();
        config.rpc.token = "t".to_string();
        config
    }

    #[test]
    fn test_select_known_provider() {
        assert!(select_provider(&config("blockscout")).is_ok());
    }

    #[test]
    fn test_select_unknown_provider() {
        let err = select_provider(&config("etherscan")).err().unwrap();
        assert_eq!(err.to_string(), "provider 'etherscan' not found");
    }
}
