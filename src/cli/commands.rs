use crate::config::LedgerConfig;
use crate::core::{Block, BlockChain, Transaction, Utxo};
use crate::crypto::hash::Hashable;
use crate::crypto::keys::KeyPair;
use crate::mining::BlockHandler;
use crate::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forkchain")]
#[command(about = "Forkchain - a fork-aware UTXO ledger with a depth-bounded block tree")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration
    InitConfig {
        #[arg(long, help = "Where to write the config (defaults to ~/.forkchain/config.json)")]
        path: Option<PathBuf>,
    },

    /// Mine a chain in memory, submitting competing forks along the way
    Simulate {
        #[arg(long, default_value_t = 20, help = "Number of blocks to mine")]
        blocks: u64,

        #[arg(long, default_value_t = 5, help = "Submit a rival sibling every N blocks (0 disables)")]
        fork_every: u64,
    },
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(LedgerConfig::default_path);
    let config = LedgerConfig::load_or_default(&config_path)?;

    let filter = if cli.debug { "debug".to_string() } else { config.log_level.clone() };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).try_init();

    match cli.command {
        Commands::InitConfig { path } => {
            let path = path.unwrap_or(config_path);
            LedgerConfig::default().save(&path)?;
            println!("✅ Wrote default configuration to {}", path.display());
            Ok(())
        }

        Commands::Simulate { blocks, fork_every } => simulate(&config, blocks, fork_every),
    }
}

fn simulate(config: &LedgerConfig, blocks: u64, fork_every: u64) -> Result<()> {
    let owner = KeyPair::new()?;
    let rival = KeyPair::new()?;

    let genesis = Block::new(
        None,
        Transaction::new_coinbase(config.coinbase_reward, owner.public_key.clone(), 1),
    );
    let mut spendable = Utxo::new(genesis.coinbase.hash(), 0);
    let mut balance = config.coinbase_reward;

    let blockchain = BlockChain::with_config(genesis, config);
    let mut handler = BlockHandler::with_config(blockchain, config);
    let mut forks_accepted = 0u64;

    for round in 1..=blocks {
        // One payment per block: one unit to the rival, change back to the owner
        let payment = if balance > 0 {
            let mut tx = Transaction::new();
            tx.add_input(spendable.tx_hash, spendable.index);
            tx.add_output(balance - 1, owner.public_key.clone());
            tx.add_output(1, rival.public_key.clone());
            tx.sign_input(0, &owner.private_key)?;
            handler.process_tx(tx.clone());
            Some(tx)
        } else {
            None
        };

        let block = match handler.create_block(&owner.public_key) {
            Some(block) => block,
            None => {
                log::warn!("Round {} produced no block", round);
                continue;
            }
        };

        if let Some(tx) = payment {
            let tx_hash = tx.hash();
            if block.contains_transaction(&tx_hash) {
                spendable = Utxo::new(tx_hash, 0);
                balance -= 1;
            }
        }

        if fork_every > 0 && round % fork_every == 0 {
            let height = handler.blockchain().max_height();
            let sibling = Block::new(
                block.previous_hash,
                Transaction::new_coinbase(config.coinbase_reward, rival.public_key.clone(), height),
            );
            if handler.process_block(&sibling) {
                forks_accepted += 1;
            }
        }
    }

    let chain = handler.blockchain();
    let tip_pool = chain.max_height_utxo_pool();

    println!("⛓️  Simulation finished");
    println!("   Tip:            {} (height {})", chain.max_height_hash(), chain.max_height());
    println!("   Blocks held:    {} (heights {}..={})", chain.block_count(), chain.min_height(), chain.max_height());
    println!("   Blocks mined:   {}", handler.blocks_mined());
    println!("   Forks accepted: {}", forks_accepted);
    println!("   Tip block size: {} bytes", chain.max_height_block().size());
    println!("   Tip UTXOs:      {}", tip_pool.len());
    println!("   Tip value:      {}", tip_pool.total_value().unwrap_or_default());

    Ok(())
}
