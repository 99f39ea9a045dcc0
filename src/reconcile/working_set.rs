//! The single-owner set of transactions built during one reconciliation pass.

use std::collections::HashMap;

use crate::blockchain::types::{Erc20Transfer, InternalCall, Transaction, UnmatchedTransferPolicy};

/// A sub-collection entry waiting to be filed under its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Transfer(Erc20Transfer),
    Call(InternalCall),
}

/// An attachment whose parent is not in the working set yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub parent_hash: String,
    pub attachment: Attachment,
}

/// Transactions keyed by hash, in first-seen order.
///
/// Duplicate policy: when a hash is inserted twice, the record keeps its
/// first position and the later record's direct fields, and the
/// sub-collections of both accumulate in arrival order.
#[derive(Debug, Default)]
pub struct WorkingSet {
    records: Vec<Transaction>,
    index: HashMap<String, usize>,
}

impl WorkingSet {
    /// Seed the set from the base transaction list.
    pub fn from_base(base: impl IntoIterator<Item = Transaction>) -> Self {
        base.into_iter().fold(Self::default(), |mut set, tx| {
            set.upsert(tx);
            set
        })
    }

    /// Insert a record, applying the duplicate policy.
    pub fn upsert(&mut self, mut tx: Transaction) {
        match self.index.get(&tx.hash) {
            Some(&i) => {
                let existing = &mut self.records[i];
                tracing::debug!(hash = %tx.hash, "Duplicate transaction, keeping latest fields");

                let mut transfers = std::mem::take(&mut existing.erc20_transfers);
                let mut calls = std::mem::take(&mut existing.internal_calls);
                transfers.append(&mut tx.erc20_transfers);
                calls.append(&mut tx.internal_calls);

                *existing = Transaction {
                    erc20_transfers: transfers,
                    internal_calls: calls,
                    ..tx
                };
            }
            None => {
                self.index.insert(tx.hash.clone(), self.records.len());
                self.records.push(tx);
            }
        }
    }

    /// File an attachment under its parent if the parent is present.
    ///
    /// Matched transfers go to `erc20_transfers`, matched calls to
    /// `internal_calls`. Otherwise the attachment is handed back.
    pub fn attach(&mut self, parent_hash: String, attachment: Attachment) -> Result<(), Orphan> {
        let Some(&i) = self.index.get(&parent_hash) else {
            return Err(Orphan { parent_hash, attachment });
        };

        let parent = &mut self.records[i];
        match attachment {
            Attachment::Transfer(transfer) => parent.erc20_transfers.push(transfer),
            Attachment::Call(call) => parent.internal_calls.push(call),
        }
        Ok(())
    }

    /// Insert a synthesized parent together with the orphan that caused it.
    pub fn adopt(
        &mut self,
        mut parent: Transaction,
        orphan: Orphan,
        policy: UnmatchedTransferPolicy,
    ) {
        parent.hash = orphan.parent_hash;
        match (orphan.attachment, policy) {
            (Attachment::Transfer(transfer), UnmatchedTransferPolicy::InternalCalls) => {
                parent.internal_calls.push(InternalCall::from(transfer))
            }
            (Attachment::Transfer(transfer), UnmatchedTransferPolicy::Erc20Transfers) => {
                parent.erc20_transfers.push(transfer)
            }
            (Attachment::Call(call), _) => parent.internal_calls.push(call),
        }
        self.upsert(parent);
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.index.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hand the records to the caller, in first-seen order.
    pub fn into_transactions(self) -> Vec<Transaction> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(hash: &str, value: &str) -> Transaction {
        Transaction {
            hash: hash.to_string(),
            value: Some(value.to_string()),
            ..Transaction::default()
        }
    }

    fn transfer(value: &str) -> Erc20Transfer {
        Erc20Transfer {
            from: None,
            to: None,
            contract_address: Some("0xc".to_string()),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn test_from_base_keeps_order() {
        let set = WorkingSet::from_base(vec![tx("0xa", "1"), tx("0xb", "2")]);
        let hashes: Vec<_> = set.into_transactions().into_iter().map(|t| t.hash).collect();
        assert_eq!(hashes, vec!["0xa", "0xb"]);
    }

    #[test]
    fn test_duplicate_keeps_position_and_latest_fields() {
        let mut set = WorkingSet::from_base(vec![tx("0xa", "1"), tx("0xb", "2")]);
        set.attach("0xa".to_string(), Attachment::Transfer(transfer("7"))).unwrap();
        set.upsert(tx("0xa", "3"));

        assert_eq!(set.len(), 2);
        let records = set.into_transactions();
        assert_eq!(records[0].hash, "0xa");
        assert_eq!(records[0].value.as_deref(), Some("3"));
        assert_eq!(records[0].erc20_transfers.len(), 1);
    }

    #[test]
    fn test_attach_matched() {
        let mut set = WorkingSet::from_base(vec![tx("0xa", "1")]);
        set.attach("0xa".to_string(), Attachment::Transfer(transfer("1"))).unwrap();
        set.attach("0xa".to_string(), Attachment::Transfer(transfer("2"))).unwrap();
        set.attach("0xa".to_string(), Attachment::Call(InternalCall::default())).unwrap();

        let records = set.into_transactions();
        let values: Vec<_> = records[0]
            .erc20_transfers
            .iter()
            .map(|t| t.value.clone().unwrap())
            .collect();
        assert_eq!(values, vec!["1", "2"]);
        assert_eq!(records[0].internal_calls.len(), 1);
    }

    #[test]
    fn test_attach_unmatched_returns_orphan() {
        let mut set = WorkingSet::default();
        let orphan = set
            .attach("0xb".to_string(), Attachment::Transfer(transfer("5")))
            .unwrap_err();
        assert_eq!(orphan.parent_hash, "0xb");
        assert!(set.is_empty());
    }

    #[test]
    fn test_adopt_legacy_files_transfer_as_call() {
        let mut set = WorkingSet::default();
        let orphan = set
            .attach("0xb".to_string(), Attachment::Transfer(transfer("5")))
            .unwrap_err();
        set.adopt(tx("0xb", "0"), orphan, UnmatchedTransferPolicy::InternalCalls);

        assert!(set.contains("0xb"));
        let records = set.into_transactions();
        assert!(records[0].erc20_transfers.is_empty());
        assert_eq!(records[0].internal_calls.len(), 1);
        assert_eq!(records[0].internal_calls[0].contract_address.as_deref(), Some("0xc"));
    }

    #[test]
    fn test_adopt_erc20_policy() {
        let mut set = WorkingSet::default();
        let orphan = set
            .attach("0xb".to_string(), Attachment::Transfer(transfer("5")))
            .unwrap_err();
        set.adopt(tx("0xB", "0"), orphan, UnmatchedTransferPolicy::Erc20Transfers);

        let records = set.into_transactions();
        assert_eq!(records[0].hash, "0xb");
        assert_eq!(records[0].erc20_transfers.len(), 1);
        assert!(records[0].internal_calls.is_empty());
    }
}
