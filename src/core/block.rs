use crate::core::transaction::{Amount, Transaction};
use crate::crypto::hash::{Hash256, Hashable};
use crate::crypto::keys::PublicKey;
use serde::{Deserialize, Serialize};

/// Reward minted by each block's coinbase. Fixed and not enforced by
/// validation.
pub const COINBASE_REWARD: Amount = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// `None` only for the genesis block.
    pub previous_hash: Option<Hash256>,
    pub coinbase: Transaction,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(previous_hash: Option<Hash256>, coinbase: Transaction) -> Self {
        Self {
            previous_hash,
            coinbase,
            transactions: Vec::new(),
        }
    }

    /// A block whose coinbase pays `COINBASE_REWARD` to `address` at `height`.
    pub fn with_reward(previous_hash: Option<Hash256>, address: PublicKey, height: u64) -> Self {
        Self::new(previous_hash, Transaction::new_coinbase(COINBASE_REWARD, address, height))
    }

    pub fn add_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash.is_none()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn contains_transaction(&self, tx_hash: &Hash256) -> bool {
        self.transactions.iter().any(|tx| &tx.hash() == tx_hash)
    }

    pub fn size(&self) -> usize {
        bincode::serialized_size(self).map(|n| n as usize).unwrap_or(0)
    }
}

impl Hashable for Block {
    fn hash(&self) -> Hash256 {
        let mut data = Vec::new();

        match &self.previous_hash {
            Some(previous) => {
                data.push(1);
                data.extend_from_slice(previous.as_bytes());
            }
            None => data.push(0),
        }

        data.extend_from_slice(self.coinbase.hash().as_bytes());

        data.extend_from_slice(&(self.transactions.len() as u32).to_le_bytes());
        for tx in &self.transactions {
            data.extend_from_slice(tx.hash().as_bytes());
        }

        Hash256::hash(&data)
    }
}
