use crate::core::transaction::{Amount, Transaction};
use crate::core::utxo::{Utxo, UtxoPool};
use crate::crypto::hash::Hashable;
use crate::crypto::signatures::Crypto;
use crate::{LedgerError, Result};
use std::collections::HashSet;

/// Validates transactions against a UTXO pool and applies accepted ones to it.
#[derive(Debug, Clone)]
pub struct TxHandler {
    utxo_pool: UtxoPool,
}

impl TxHandler {
    /// Takes ownership of `utxo_pool`; pass a clone to keep the caller's copy.
    pub fn new(utxo_pool: UtxoPool) -> Self {
        Self { utxo_pool }
    }

    /// True iff `tx` spends only pooled outputs, each exactly once, with
    /// valid signatures, non-negative outputs and no value created.
    pub fn is_valid_tx(&self, tx: &Transaction) -> bool {
        self.check_tx(tx).is_ok()
    }

    /// Validates `tx` and returns its surplus (inputs minus outputs), or the
    /// first rule it breaks.
    pub fn check_tx(&self, tx: &Transaction) -> Result<Amount> {
        let mut claimed: HashSet<Utxo> = HashSet::with_capacity(tx.inputs.len());
        let mut input_sum: Amount = 0;

        // Validate all inputs
        for (i, input) in tx.inputs.iter().enumerate() {
            let utxo = input.utxo();

            // Check if UTXO exists
            let spent_output = self.utxo_pool.get_output(&utxo)
                .ok_or(LedgerError::MissingUtxo { input: i })?;

            // Check the signature against the owner of the claimed output
            let message = tx.raw_data_to_sign(i)
                .ok_or(LedgerError::InvalidInputIndex(i))?;
            if !Crypto::verify_signature(&spent_output.address, &message, &input.signature) {
                return Err(LedgerError::InvalidSignature { input: i });
            }

            // Each UTXO may be claimed once per transaction
            if !claimed.insert(utxo) {
                return Err(LedgerError::DoubleClaim { input: i });
            }

            input_sum = input_sum.checked_add(spent_output.value)
                .ok_or(LedgerError::ValueOverflow)?;
        }

        // Validate all outputs
        if let Some(index) = tx.outputs.iter().position(|output| output.value < 0) {
            return Err(LedgerError::NegativeOutput { index });
        }

        // Check that inputs >= outputs (the surplus is the fee)
        let output_sum = tx.total_output_value().ok_or(LedgerError::ValueOverflow)?;
        if input_sum < output_sum {
            return Err(LedgerError::InsufficientInputs {
                inputs: input_sum,
                outputs: output_sum,
            });
        }

        Ok(input_sum - output_sum)
    }

    /// Greedy single pass over `possible_txs` in order. Each transaction that
    /// is valid against the pool as updated so far is applied and returned;
    /// the rest are dropped. The result is mutually valid but not necessarily
    /// the largest such subset.
    pub fn handle_txs(&mut self, possible_txs: &[Transaction]) -> Vec<Transaction> {
        let mut accepted = Vec::new();

        for tx in possible_txs {
            match self.check_tx(tx) {
                Ok(_) => {
                    self.apply_tx(tx);
                    accepted.push(tx.clone());
                }
                Err(e) => {
                    log::debug!("Dropping transaction {}: {}", tx.hash().short(), e);
                }
            }
        }

        log::trace!("Accepted {} of {} transactions", accepted.len(), possible_txs.len());
        accepted
    }

    pub fn utxo_pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    pub fn into_utxo_pool(self) -> UtxoPool {
        self.utxo_pool
    }

    fn apply_tx(&mut self, tx: &Transaction) {
        // Remove spent UTXOs (inputs)
        for input in &tx.inputs {
            self.utxo_pool.remove_utxo(&input.utxo());
        }

        // Add new UTXOs (outputs)
        let tx_hash = tx.hash();
        for (index, output) in tx.outputs.iter().enumerate() {
            self.utxo_pool.add_utxo(Utxo::new(tx_hash, index as u32), output.clone());
        }
    }
}
