//! Forkchain - a fork-aware UTXO ledger
//!
//! This library implements:
//! - A UTXO pool and a transaction validator that greedily applies batches
//! - A multi-branch block tree holding an independent UTXO snapshot per block
//! - Tip tracking with a sliding cut-off below the tip, and pruning
//! - An insert-and-remove transaction pool and a block assembler for miners
//!
//! The ledger is not internally synchronized; hosts serialize access.

pub mod core;
pub mod crypto;
pub mod consensus;
pub mod mining;
pub mod cli;
pub mod error;
pub mod config;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{LedgerConfig, CUT_OFF_AGE};
pub use error::{LedgerError, Result};
