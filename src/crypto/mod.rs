//! Cryptographic primitives for the ledger

pub mod keys;
pub mod signatures;
pub mod hash;

pub use keys::{PrivateKey, PublicKey, KeyPair};
pub use signatures::{Crypto, Signature};
pub use hash::{Hash256, Hashable};
