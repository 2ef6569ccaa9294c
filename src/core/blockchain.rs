use crate::config::LedgerConfig;
use crate::consensus::tx_handler::TxHandler;
use crate::core::block::Block;
use crate::core::transaction::Transaction;
use crate::core::transaction_pool::TransactionPool;
use crate::core::utxo::{Utxo, UtxoPool};
use crate::crypto::hash::{Hash256, Hashable};
use crate::{LedgerError, Result};
use std::collections::HashMap;

/// A stored block together with its position in the tree and the UTXO pool
/// after applying every block from the root of its branch.
#[derive(Debug, Clone)]
struct BlockNode {
    block: Block,
    parent: Option<Hash256>,
    height: u64,
    utxo_pool: UtxoPool,
    children: Vec<Hash256>,
}

/// Multi-branch block tree with a per-node UTXO snapshot.
///
/// Tracks the tip (greatest height, first seen wins ties) and refuses blocks
/// whose height is `cut_off_age` or more below it. Not internally
/// synchronized: hosts serialize access.
#[derive(Debug, Clone)]
pub struct BlockChain {
    nodes: HashMap<Hash256, BlockNode>,
    tip: Hash256,
    cut_off_age: u64,
    prune: bool,
    transaction_pool: TransactionPool,
}

impl BlockChain {
    /// Creates a chain holding only `genesis_block`, which is assumed valid.
    pub fn new(genesis_block: Block) -> Self {
        Self::with_config(genesis_block, &LedgerConfig::default())
    }

    pub fn with_config(genesis_block: Block, config: &LedgerConfig) -> Self {
        let mut utxo_pool = UtxoPool::new();
        add_coinbase_outputs(&genesis_block.coinbase, &mut utxo_pool);

        let genesis_hash = genesis_block.hash();
        let genesis = BlockNode {
            block: genesis_block,
            parent: None,
            height: 1,
            utxo_pool,
            children: Vec::new(),
        };

        let mut nodes = HashMap::new();
        nodes.insert(genesis_hash, genesis);

        log::info!("Initialized block chain at genesis {}", genesis_hash.short());

        Self {
            nodes,
            tip: genesis_hash,
            cut_off_age: config.cut_off_age,
            prune: config.prune,
            transaction_pool: TransactionPool::new(),
        }
    }

    pub fn max_height_block(&self) -> &Block {
        &self.tip_node().block
    }

    pub fn max_height(&self) -> u64 {
        self.tip_node().height
    }

    pub fn max_height_hash(&self) -> Hash256 {
        self.tip
    }

    /// A copy of the tip's UTXO pool, for mining on top of the tip.
    pub fn max_height_utxo_pool(&self) -> UtxoPool {
        self.tip_node().utxo_pool.clone()
    }

    pub fn transaction_pool(&self) -> &TransactionPool {
        &self.transaction_pool
    }

    pub fn transaction_pool_mut(&mut self) -> &mut TransactionPool {
        &mut self.transaction_pool
    }

    pub fn add_transaction(&mut self, tx: Transaction) {
        self.transaction_pool.add_transaction(tx);
    }

    /// Adds `block` if it is valid; see `try_add_block`.
    pub fn add_block(&mut self, block: &Block) -> bool {
        match self.try_add_block(block) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("Rejected block {}: {}", block.hash().short(), e);
                false
            }
        }
    }

    /// Adds `block` on top of its stored parent and returns its height.
    ///
    /// Every regular transaction must be accepted by a `TxHandler` over the
    /// parent's pool, and the new height must be above
    /// `tip height - cut_off_age`. A rejected block leaves the chain unchanged.
    pub fn try_add_block(&mut self, block: &Block) -> Result<u64> {
        let previous_hash = block.previous_hash.ok_or(LedgerError::GenesisReplay)?;

        let block_hash = block.hash();
        if self.nodes.contains_key(&block_hash) {
            return Err(LedgerError::DuplicateBlock(block_hash));
        }

        let parent = self.nodes.get(&previous_hash)
            .ok_or(LedgerError::UnknownParent(previous_hash))?;

        let height = parent.height + 1;
        let tip_height = self.max_height();
        if height + self.cut_off_age <= tip_height {
            return Err(LedgerError::BelowCutOff { height, tip_height });
        }

        let mut handler = TxHandler::new(parent.utxo_pool.clone());
        let accepted = handler.handle_txs(&block.transactions);
        if accepted.len() != block.transactions.len() {
            return Err(LedgerError::InvalidTransactions {
                accepted: accepted.len(),
                submitted: block.transactions.len(),
            });
        }

        let mut utxo_pool = handler.into_utxo_pool();
        add_coinbase_outputs(&block.coinbase, &mut utxo_pool);

        self.nodes.insert(block_hash, BlockNode {
            block: block.clone(),
            parent: Some(previous_hash),
            height,
            utxo_pool,
            children: Vec::new(),
        });
        if let Some(parent) = self.nodes.get_mut(&previous_hash) {
            parent.children.push(block_hash);
        }

        log::info!(
            "✅ Added block {} at height {} with {} transactions",
            block_hash.short(), height, block.transaction_count()
        );

        if height > tip_height {
            self.tip = block_hash;
            log::info!("New tip {} at height {}", block_hash.short(), height);
            if self.prune {
                self.prune_stale_nodes();
            }
        }

        Ok(height)
    }

    pub fn get_block(&self, hash: &Hash256) -> Option<&Block> {
        self.nodes.get(hash).map(|node| &node.block)
    }

    pub fn contains_block(&self, hash: &Hash256) -> bool {
        self.nodes.contains_key(hash)
    }

    pub fn height_of(&self, hash: &Hash256) -> Option<u64> {
        self.nodes.get(hash).map(|node| node.height)
    }

    pub fn parent_of(&self, hash: &Hash256) -> Option<Hash256> {
        self.nodes.get(hash).and_then(|node| node.parent)
    }

    pub fn children_of(&self, hash: &Hash256) -> Option<&[Hash256]> {
        self.nodes.get(hash).map(|node| node.children.as_slice())
    }

    /// A copy of the UTXO pool after the block `hash`.
    pub fn utxo_pool_at(&self, hash: &Hash256) -> Option<UtxoPool> {
        self.nodes.get(hash).map(|node| node.utxo_pool.clone())
    }

    pub fn block_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cut_off_age(&self) -> u64 {
        self.cut_off_age
    }

    /// Lowest height still held in the tree.
    pub fn min_height(&self) -> u64 {
        self.nodes.values().map(|node| node.height).min().unwrap_or(1)
    }

    fn tip_node(&self) -> &BlockNode {
        &self.nodes[&self.tip]
    }

    /// Drops nodes below `tip height - cut_off_age`. Such nodes can never
    /// parent an admissible block again. Their children are higher, so the
    /// child lists of surviving nodes stay intact.
    fn prune_stale_nodes(&mut self) {
        let min_height = self.max_height().saturating_sub(self.cut_off_age);
        let before = self.nodes.len();

        self.nodes.retain(|_, node| node.height >= min_height);

        let pruned = before - self.nodes.len();
        if pruned > 0 {
            log::debug!("Pruned {} blocks below height {}", pruned, min_height);
        }
    }
}

fn add_coinbase_outputs(coinbase: &Transaction, utxo_pool: &mut UtxoPool) {
    let coinbase_hash = coinbase.hash();
    for (index, output) in coinbase.outputs.iter().enumerate() {
        utxo_pool.add_utxo(Utxo::new(coinbase_hash, index as u32), output.clone());
    }
}
