use crate::config::LedgerConfig;
use crate::consensus::tx_handler::TxHandler;
use crate::core::{Block, BlockChain, Transaction};
use crate::core::block::COINBASE_REWARD;
use crate::core::transaction::Amount;
use crate::crypto::hash::Hashable;
use crate::crypto::keys::PublicKey;

/// Miner-facing front end of a `BlockChain`: assembles blocks on the tip from
/// the transaction pool and forwards incoming blocks and transactions.
#[derive(Debug)]
pub struct BlockHandler {
    blockchain: BlockChain,
    coinbase_reward: Amount,
    blocks_mined: u64,
}

impl BlockHandler {
    pub fn new(blockchain: BlockChain) -> Self {
        Self {
            blockchain,
            coinbase_reward: COINBASE_REWARD,
            blocks_mined: 0,
        }
    }

    pub fn with_config(blockchain: BlockChain, config: &LedgerConfig) -> Self {
        Self {
            coinbase_reward: config.coinbase_reward,
            ..Self::new(blockchain)
        }
    }

    /// Adds a block received from elsewhere.
    pub fn process_block(&mut self, block: &Block) -> bool {
        self.blockchain.add_block(block)
    }

    /// Queues a transaction for the next mined block.
    pub fn process_tx(&mut self, tx: Transaction) {
        self.blockchain.add_transaction(tx);
    }

    /// Builds a block on the current tip paying the coinbase to `miner`,
    /// filled with the pooled transactions that are valid on the tip, and
    /// adds it to the chain. Mined transactions leave the pool.
    pub fn create_block(&mut self, miner: &PublicKey) -> Option<Block> {
        let parent_hash = self.blockchain.max_height_hash();
        let height = self.blockchain.max_height() + 1;

        let coinbase = Transaction::new_coinbase(self.coinbase_reward, miner.clone(), height);
        let mut block = Block::new(Some(parent_hash), coinbase);

        let mut handler = TxHandler::new(self.blockchain.max_height_utxo_pool());
        let candidates = self.blockchain.transaction_pool().transactions();
        for tx in handler.handle_txs(&candidates) {
            block.add_transaction(tx);
        }

        match self.blockchain.try_add_block(&block) {
            Ok(_) => {
                let pool = self.blockchain.transaction_pool_mut();
                for tx in &block.transactions {
                    pool.remove_transaction(&tx.hash());
                }

                self.blocks_mined += 1;
                log::info!(
                    "⛏️  Mined block {} at height {} ({} of {} pooled transactions)",
                    block.hash().short(), height, block.transaction_count(), candidates.len()
                );
                Some(block)
            }
            Err(e) => {
                log::warn!("❌ Failed to add mined block at height {}: {}", height, e);
                None
            }
        }
    }

    pub fn blocks_mined(&self) -> u64 {
        self.blocks_mined
    }

    pub fn blockchain(&self) -> &BlockChain {
        &self.blockchain
    }

    pub fn into_blockchain(self) -> BlockChain {
        self.blockchain
    }
}
