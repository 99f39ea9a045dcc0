//! Merge of the three per-account collections into unified transactions.

use async_trait::async_trait;

use crate::blockchain::types::{GatewayError, GatewayResult, Transaction, UnmatchedTransferPolicy};
use crate::explorer::raw::{ParentedCall, ParentedTransfer};
use crate::reconcile::working_set::{Attachment, Orphan, WorkingSet};

/// Looks up a transaction that a transfer or internal call referenced but
/// the base list did not contain.
#[async_trait]
pub trait ParentResolver: Send + Sync {
    async fn resolve(&self, hash: &str) -> GatewayResult<Transaction>;
}

/// One reconciliation pass over an account's collections.
///
/// Parents are synthesized one at a time, so the working set only ever has
/// one writer.
pub struct Reconciler<'a, R: ?Sized> {
    resolver: &'a R,
    policy: UnmatchedTransferPolicy,
}

impl<'a, R: ParentResolver + ?Sized> Reconciler<'a, R> {
    pub fn new(resolver: &'a R, policy: UnmatchedTransferPolicy) -> Self {
        Self { resolver, policy }
    }

    /// Build one transaction per distinct hash.
    ///
    /// Transfers are filed before internal calls, each in arrival order.
    /// The result is in first-seen order, but callers must not rely on any
    /// order. Any failure while synthesizing a parent aborts the whole pass.
    pub async fn reconcile(
        &self,
        base: Vec<Transaction>,
        transfers: Vec<ParentedTransfer>,
        calls: Vec<ParentedCall>,
    ) -> GatewayResult<Vec<Transaction>> {
        let attachments = transfers
            .into_iter()
            .map(|t| (t.parent_hash, Attachment::Transfer(t.transfer)))
            .chain(
                calls
                    .into_iter()
                    .map(|c| (c.parent_hash, Attachment::Call(c.call))),
            );

        let mut set = WorkingSet::from_base(base);
        let seeded = set.len();

        for (parent_hash, attachment) in attachments {
            set = self.attach(set, parent_hash, attachment).await?;
        }

        tracing::debug!(
            base = seeded,
            synthesized = set.len() - seeded,
            "Reconciliation complete"
        );
        Ok(set.into_transactions())
    }

    async fn attach(
        &self,
        mut set: WorkingSet,
        parent_hash: String,
        attachment: Attachment,
    ) -> GatewayResult<WorkingSet> {
        if let Err(orphan) = set.attach(parent_hash, attachment) {
            let parent = self.synthesize(&orphan).await?;
            set.adopt(parent, orphan, self.policy);
        }
        Ok(set)
    }

    async fn synthesize(&self, orphan: &Orphan) -> GatewayResult<Transaction> {
        let hash = orphan.parent_hash.as_str();
        tracing::debug!(hash, "Synthesizing parent transaction");

        self.resolver.resolve(hash).await.map_err(|e| match e {
            GatewayError::TransactionNotFound(_) => {
                tracing::warn!(hash, "Referenced parent transaction could not be resolved");
                GatewayError::SynthesisIncomplete { hash: hash.to_string() }
            }
            other => other,
        })
    }
}
