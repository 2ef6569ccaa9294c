use crate::core::utxo::Utxo;
use crate::crypto::hash::{Hash256, Hashable};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Value in indivisible units. Signed so a negative output can be expressed
/// and rejected by validation.
pub type Amount = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// Distinguishes otherwise identical transactions. Coinbases carry their
    /// block height here.
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub prev_tx_hash: Hash256,
    pub output_index: u32,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub value: Amount,
    pub address: PublicKey,
}

impl TxInput {
    pub fn new(prev_tx_hash: Hash256, output_index: u32) -> Self {
        Self {
            prev_tx_hash,
            output_index,
            signature: Vec::new(),
        }
    }

    /// The unspent output this input claims.
    pub fn utxo(&self) -> Utxo {
        Utxo::new(self.prev_tx_hash, self.output_index)
    }
}

impl TxOutput {
    pub fn new(value: Amount, address: PublicKey) -> Self {
        Self { value, address }
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            nonce: 0,
        }
    }

    pub fn new_coinbase(value: Amount, address: PublicKey, height: u64) -> Self {
        Self {
            version: 1,
            inputs: Vec::new(),
            outputs: vec![TxOutput::new(value, address)],
            nonce: height,
        }
    }

    pub fn add_input(&mut self, prev_tx_hash: Hash256, output_index: u32) {
        self.inputs.push(TxInput::new(prev_tx_hash, output_index));
    }

    pub fn add_output(&mut self, value: Amount, address: PublicKey) {
        self.outputs.push(TxOutput::new(value, address));
    }

    pub fn remove_input(&mut self, index: usize) -> Option<TxInput> {
        if index < self.inputs.len() {
            Some(self.inputs.remove(index))
        } else {
            None
        }
    }

    pub fn add_signature(&mut self, signature: Vec<u8>, index: usize) -> Result<()> {
        let input = self.inputs.get_mut(index)
            .ok_or(LedgerError::InvalidInputIndex(index))?;
        input.signature = signature;
        Ok(())
    }

    /// Signs input `index` over `raw_data_to_sign(index)`.
    pub fn sign_input(&mut self, index: usize, private_key: &PrivateKey) -> Result<()> {
        let message = self.raw_data_to_sign(index)
            .ok_or(LedgerError::InvalidInputIndex(index))?;
        let signature = private_key.sign(&message);

        // Store in compact form, the same bytes verification expects
        self.add_signature(signature.to_bytes(), index)
    }

    pub fn is_coinbase(&self) -> bool {
        // Coinbases mint value and claim nothing
        self.inputs.is_empty()
    }

    pub fn input(&self, index: usize) -> Option<&TxInput> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&TxOutput> {
        self.outputs.get(index)
    }

    /// Checked sum of output values; `None` on overflow.
    pub fn total_output_value(&self) -> Option<Amount> {
        self.outputs.iter()
            .try_fold(0 as Amount, |acc, output| acc.checked_add(output.value))
    }

    pub fn size(&self) -> usize {
        // Serialization into memory cannot fail for this type
        bincode::serialized_size(self).map(|n| n as usize).unwrap_or(0)
    }

    /// The message signed by input `index`.
    ///
    /// Covers the input index, every input's claimed outpoint, every output,
    /// version and nonce. All signature fields are left out, so the bytes do
    /// not depend on which inputs have been signed yet.
    pub fn raw_data_to_sign(&self, index: usize) -> Option<Vec<u8>> {
        if index >= self.inputs.len() {
            return None;
        }

        // Bind the signature to the input it belongs to
        let mut data = Vec::new();
        data.extend_from_slice(&(index as u32).to_le_bytes());
        self.write_body(&mut data, false);
        Some(data)
    }

    /// Full serialization, signatures included. This is what the hash covers.
    pub fn raw_tx(&self) -> Vec<u8> {
        let mut data = Vec::new();
        self.write_body(&mut data, true);
        data
    }

    fn write_body(&self, data: &mut Vec<u8>, with_signatures: bool) {
        // Add version
        data.extend_from_slice(&self.version.to_le_bytes());

        // Add inputs, each as the outpoint it claims
        data.extend_from_slice(&(self.inputs.len() as u32).to_le_bytes());
        for input in &self.inputs {
            data.extend_from_slice(input.prev_tx_hash.as_bytes());
            data.extend_from_slice(&input.output_index.to_le_bytes());
            if with_signatures {
                // Signatures are length-prefixed
                data.extend_from_slice(&(input.signature.len() as u32).to_le_bytes());
                data.extend_from_slice(&input.signature);
            }
        }

        // Add outputs
        data.extend_from_slice(&(self.outputs.len() as u32).to_le_bytes());
        for output in &self.outputs {
            let address = output.address.to_bytes();
            data.extend_from_slice(&output.value.to_le_bytes());
            data.extend_from_slice(&(address.len() as u32).to_le_bytes());
            data.extend_from_slice(address);
        }

        // Add nonce
        data.extend_from_slice(&self.nonce.to_le_bytes());
    }
}

impl Hashable for Transaction {
    fn hash(&self) -> Hash256 {
        Hash256::hash(&self.raw_tx())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;
    use crate::crypto::signatures::Crypto;

    #[test]
    fn test_coinbase_transaction() -> Result<()> {
        let miner = KeyPair::new()?;
        let tx = Transaction::new_coinbase(25, miner.public_key.clone(), 1);

        assert!(tx.is_coinbase());
        assert_eq!(tx.inputs.len(), 0);
        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(tx.outputs[0].value, 25);
        assert_eq!(tx.outputs[0].address, miner.public_key);

        Ok(())
    }

    #[test]
    fn test_coinbase_height_changes_hash() -> Result<()> {
        let miner = KeyPair::new()?;
        let at_two = Transaction::new_coinbase(25, miner.public_key.clone(), 2);
        let at_three = Transaction::new_coinbase(25, miner.public_key.clone(), 3);

        assert_ne!(at_two.hash(), at_three.hash());

        Ok(())
    }

    #[test]
    fn test_transaction_hash_is_order_sensitive() -> Result<()> {
        let alice = KeyPair::new()?;
        let bob = KeyPair::new()?;

        let mut tx1 = Transaction::new();
        tx1.add_output(1, alice.public_key.clone());
        tx1.add_output(2, bob.public_key.clone());

        // Same outputs, swapped
        let mut tx2 = Transaction::new();
        tx2.add_output(2, bob.public_key.clone());
        tx2.add_output(1, alice.public_key.clone());

        assert_eq!(tx1.hash(), tx1.clone().hash());
        assert_ne!(tx1.hash(), tx2.hash());

        Ok(())
    }

    #[test]
    fn test_signatures_change_hash_but_not_signing_data() -> Result<()> {
        let alice = KeyPair::new()?;

        let mut tx = Transaction::new();
        tx.add_input(Hash256::hash(b"prev"), 0);
        tx.add_input(Hash256::hash(b"prev"), 1);
        tx.add_output(5, alice.public_key.clone());

        let unsigned_hash = tx.hash();
        let digest_before = tx.raw_data_to_sign(0);

        // Signing input 1 must not disturb what input 0 signs
        tx.sign_input(1, &alice.private_key)?;

        assert_ne!(tx.hash(), unsigned_hash);
        assert_eq!(tx.raw_data_to_sign(0), digest_before);
        assert_ne!(tx.raw_data_to_sign(0), tx.raw_data_to_sign(1));

        Ok(())
    }

    #[test]
    fn test_sign_input_verifies() -> Result<()> {
        let alice = KeyPair::new()?;
        let bob = KeyPair::new()?;

        let mut tx = Transaction::new();
        tx.add_input(Hash256::hash(b"prev"), 0);
        tx.add_output(7, bob.public_key.clone());
        tx.sign_input(0, &alice.private_key)?;

        let message = tx.raw_data_to_sign(0).unwrap();
        assert!(Crypto::verify_signature(&alice.public_key, &message, &tx.inputs[0].signature));
        assert!(!Crypto::verify_signature(&bob.public_key, &message, &tx.inputs[0].signature));

        Ok(())
    }

    #[test]
    fn test_out_of_range_input_index() -> Result<()> {
        let alice = KeyPair::new()?;
        let mut tx = Transaction::new();

        assert!(tx.raw_data_to_sign(0).is_none());
        assert!(matches!(
            tx.sign_input(0, &alice.private_key),
            Err(LedgerError::InvalidInputIndex(0))
        ));
        assert!(tx.remove_input(0).is_none());

        Ok(())
    }

    #[test]
    fn test_total_output_value_overflow() -> Result<()> {
        let alice = KeyPair::new()?;

        let mut tx = Transaction::new();
        tx.add_output(Amount::MAX, alice.public_key.clone());
        assert_eq!(tx.total_output_value(), Some(Amount::MAX));

        // One more unit overflows
        tx.add_output(1, alice.public_key.clone());
        assert_eq!(tx.total_output_value(), None);

        Ok(())
    }
}
