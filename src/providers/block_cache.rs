//! Process-wide "last known current block" slot.
//!
//! One background task refreshes the slot on a fixed interval; any number
//! of readers load it without locking. A reader may observe a block up to
//! one interval old.

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::blockchain::types::Block;
use crate::explorer::client::BlockSource;
use crate::observability::metrics;

/// Single-value, lock-free holder for the latest known block.
pub struct BlockCache {
    slot: ArcSwapOption<Block>,
}

impl BlockCache {
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    /// Latest stored block, if a refresh has succeeded yet.
    pub fn get(&self) -> Option<Arc<Block>> {
        self.slot.load_full()
    }

    pub fn store(&self, block: Block) {
        if let Ok(height) = block.height.parse::<f64>() {
            metrics::record_block_height(height);
        }
        self.slot.store(Some(Arc::new(block)));
    }

    pub fn clear(&self) {
        self.slot.store(None);
    }
}

impl Default for BlockCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the refresher. It ticks immediately, then every `interval`, and
/// clears the slot when the shutdown signal arrives.
pub fn spawn_refresher<S>(
    cache: Arc<BlockCache>,
    source: S,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()>
where
    S: BlockSource + 'static,
{
    tokio::spawn(async move {
        tracing::info!(interval_secs = interval.as_secs(), "Block cache refresher starting");
        let mut ticker = time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match source.current_block().await {
                        Ok(block) => {
                            tracing::debug!(height = %block.height, "Current block refreshed");
                            cache.store(block);
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                "Current block refresh failed, keeping previous value"
                            );
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Block cache refresher received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        cache.clear();
    })
}
