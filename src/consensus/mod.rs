//! Transaction validation against a UTXO pool

pub mod tx_handler;

pub use tx_handler::TxHandler;
