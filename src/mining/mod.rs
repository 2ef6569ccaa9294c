//! Block assembly on top of the ledger

pub mod block_handler;

pub use block_handler::BlockHandler;
