use crate::core::transaction::Transaction;
use crate::crypto::hash::{Hash256, Hashable};
use std::collections::HashMap;

/// Staging area for transactions waiting to be mined. Performs no
/// validation; callers run `TxHandler` before including anything.
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    transactions: HashMap<Hash256, Transaction>,
    order: Vec<Hash256>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tx`, replacing any transaction with the same hash.
    pub fn add_transaction(&mut self, tx: Transaction) {
        let tx_hash = tx.hash();
        if self.transactions.insert(tx_hash, tx).is_none() {
            self.order.push(tx_hash);
        }
    }

    pub fn remove_transaction(&mut self, tx_hash: &Hash256) -> Option<Transaction> {
        let removed = self.transactions.remove(tx_hash)?;
        self.order.retain(|hash| hash != tx_hash);
        Some(removed)
    }

    pub fn get_transaction(&self, tx_hash: &Hash256) -> Option<&Transaction> {
        self.transactions.get(tx_hash)
    }

    pub fn contains(&self, tx_hash: &Hash256) -> bool {
        self.transactions.contains_key(tx_hash)
    }

    /// All pooled transactions in insertion order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.order.iter()
            .filter_map(|hash| self.transactions.get(hash))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
