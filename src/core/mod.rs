//! Core ledger components

pub mod blockchain;
pub mod block;
pub mod transaction;
pub mod transaction_pool;
pub mod utxo;

pub use blockchain::BlockChain;
pub use block::{Block, COINBASE_REWARD};
pub use transaction::{Amount, Transaction, TxInput, TxOutput};
pub use transaction_pool::TransactionPool;
pub use utxo::{Utxo, UtxoPool};
