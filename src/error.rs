use crate::crypto::hash::Hash256;
use crate::core::transaction::Amount;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Block has no previous hash; only the genesis block may omit it")]
    GenesisReplay,

    #[error("Block {0} is already stored")]
    DuplicateBlock(Hash256),

    #[error("Parent block {0} is not stored")]
    UnknownParent(Hash256),

    #[error("Block height {height} is too far below tip height {tip_height}")]
    BelowCutOff { height: u64, tip_height: u64 },

    #[error("Only {accepted} of {submitted} block transactions are valid")]
    InvalidTransactions { accepted: usize, submitted: usize },

    #[error("Input {input} claims an output that is not in the UTXO pool")]
    MissingUtxo { input: usize },

    #[error("Invalid signature on input {input}")]
    InvalidSignature { input: usize },

    #[error("Input {input} claims an output already claimed by this transaction")]
    DoubleClaim { input: usize },

    #[error("Output {index} has negative value")]
    NegativeOutput { index: usize },

    #[error("Transaction value overflows")]
    ValueOverflow,

    #[error("Insufficient inputs: inputs {inputs}, outputs {outputs}")]
    InsufficientInputs { inputs: Amount, outputs: Amount },

    #[error("Invalid input index: {0}")]
    InvalidInputIndex(usize),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// True for the per-transaction validation failures raised by `TxHandler`.
    pub fn is_transaction_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::MissingUtxo { .. }
                | LedgerError::InvalidSignature { .. }
                | LedgerError::DoubleClaim { .. }
                | LedgerError::NegativeOutput { .. }
                | LedgerError::ValueOverflow
                | LedgerError::InsufficientInputs { .. }
        )
    }
}
