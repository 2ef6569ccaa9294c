//! Builders shared by the unit tests.

use crate::core::block::Block;
use crate::core::transaction::{Amount, Transaction};
use crate::core::utxo::Utxo;
use crate::crypto::hash::{Hash256, Hashable};
use crate::crypto::keys::KeyPair;

pub fn keypair() -> KeyPair {
    KeyPair::new().expect("key generation")
}

/// Genesis block whose coinbase pays `value` to `owner`.
pub fn genesis(owner: &KeyPair, value: Amount) -> Block {
    Block::new(None, Transaction::new_coinbase(value, owner.public_key.clone(), 1))
}

/// Empty block on `parent` at `height` with a coinbase of `value` to `miner`.
pub fn block_on(parent: Hash256, miner: &KeyPair, value: Amount, height: u64) -> Block {
    Block::new(Some(parent), Transaction::new_coinbase(value, miner.public_key.clone(), height))
}

/// Transaction spending `utxos` (all owned by `from`) into `outputs`, signed.
pub fn pay(from: &KeyPair, utxos: &[Utxo], outputs: &[(Amount, &KeyPair)]) -> Transaction {
    let mut tx = Transaction::new();
    for utxo in utxos {
        tx.add_input(utxo.tx_hash, utxo.index);
    }
    for (value, owner) in outputs {
        tx.add_output(*value, owner.public_key.clone());
    }
    for i in 0..utxos.len() {
        tx.sign_input(i, &from.private_key).expect("input exists");
    }
    tx
}

pub fn coinbase_utxo(block: &Block) -> Utxo {
    Utxo::new(block.coinbase.hash(), 0)
}
