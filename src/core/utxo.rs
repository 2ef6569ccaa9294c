use crate::core::transaction::{Amount, TxOutput};
use crate::crypto::hash::Hash256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identity of a transaction output: producing transaction hash and the
/// output's position in that transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Utxo {
    pub tx_hash: Hash256,
    pub index: u32,
}

impl Utxo {
    pub fn new(tx_hash: Hash256, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

impl fmt::Display for Utxo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash.short(), self.index)
    }
}

/// Unspent outputs keyed by `Utxo`. Cloning yields an independent pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtxoPool {
    utxos: HashMap<Utxo, TxOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    pub fn add_utxo(&mut self, utxo: Utxo, output: TxOutput) {
        // Insert or overwrite
        self.utxos.insert(utxo, output);
    }

    pub fn remove_utxo(&mut self, utxo: &Utxo) {
        // Removing an absent UTXO is a no-op
        self.utxos.remove(utxo);
    }

    pub fn get_output(&self, utxo: &Utxo) -> Option<&TxOutput> {
        self.utxos.get(utxo)
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    pub fn all_utxos(&self) -> Vec<Utxo> {
        // Unordered, like the map itself
        self.utxos.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Utxo, &TxOutput)> {
        self.utxos.iter()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Checked sum of every unspent value; `None` on overflow.
    pub fn total_value(&self) -> Option<Amount> {
        self.utxos.values()
            .try_fold(0 as Amount, |acc, output| acc.checked_add(output.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;
    use crate::Result;

    #[test]
    fn test_utxo_equality_is_bytewise() {
        let a = Utxo::new(Hash256::new([7u8; 32]), 1);
        let b = Utxo::new(Hash256::new([7u8; 32]), 1);
        let c = Utxo::new(Hash256::new([7u8; 32]), 2);

        assert_eq!(a, b);
        assert_ne!(a, c);

        // Lookup goes by value, not by the instance that was inserted
        let mut pool = UtxoPool::new();
        let owner = KeyPair::new().unwrap();
        pool.add_utxo(a, TxOutput::new(3, owner.public_key));
        assert!(pool.contains(&b));
        assert!(!pool.contains(&c));
    }

    #[test]
    fn test_add_overwrites_and_remove_is_idempotent() -> Result<()> {
        let owner = KeyPair::new()?;
        let utxo = Utxo::new(Hash256::hash(b"tx"), 0);
        let mut pool = UtxoPool::new();

        // Second insert replaces the first
        pool.add_utxo(utxo, TxOutput::new(3, owner.public_key.clone()));
        pool.add_utxo(utxo, TxOutput::new(4, owner.public_key.clone()));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get_output(&utxo).map(|o| o.value), Some(4));

        // Second remove finds nothing
        pool.remove_utxo(&utxo);
        pool.remove_utxo(&utxo);
        assert!(pool.is_empty());
        assert!(pool.get_output(&utxo).is_none());

        Ok(())
    }

    #[test]
    fn test_clone_is_independent() -> Result<()> {
        let owner = KeyPair::new()?;
        let first = Utxo::new(Hash256::hash(b"a"), 0);
        let second = Utxo::new(Hash256::hash(b"b"), 0);

        let mut base = UtxoPool::new();
        base.add_utxo(first, TxOutput::new(10, owner.public_key.clone()));

        // Mutate the copy only
        let mut copy = base.clone();
        copy.remove_utxo(&first);
        copy.add_utxo(second, TxOutput::new(5, owner.public_key.clone()));

        assert!(base.contains(&first));
        assert!(!base.contains(&second));
        assert_eq!(base.total_value(), Some(10));
        assert_eq!(copy.total_value(), Some(5));

        Ok(())
    }

    #[test]
    fn test_all_utxos_enumerates_everything() -> Result<()> {
        let owner = KeyPair::new()?;
        let mut pool = UtxoPool::new();
        for i in 0..4 {
            pool.add_utxo(Utxo::new(Hash256::hash(b"tx"), i), TxOutput::new(1, owner.public_key.clone()));
        }

        // Sort before comparing; enumeration order is unspecified
        let mut all = pool.all_utxos();
        all.sort();
        let indices: Vec<u32> = all.iter().map(|u| u.index).collect();

        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(pool.iter().count(), 4);

        Ok(())
    }
}
