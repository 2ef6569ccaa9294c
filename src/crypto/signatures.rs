use crate::crypto::hash::Hash256;
use crate::crypto::keys::PublicKey;
use crate::{LedgerError, Result};
use secp256k1::{ecdsa::Signature as Secp256k1Signature, Secp256k1, Message, PublicKey as Secp256k1PublicKey, SecretKey};
use serde::{Deserialize, Serialize};

/// Compact 64-byte ECDSA signature (r || s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Secp256k1Signature::from_compact(bytes)
            .map_err(|e| LedgerError::Crypto(format!("Invalid signature: {}", e)))?;

        Ok(Self { bytes: bytes.to_vec() })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn from_secp256k1(signature: Secp256k1Signature) -> Self {
        Self {
            bytes: signature.serialize_compact().to_vec(),
        }
    }
}

/// Signature primitives consumed by transaction validation.
pub struct Crypto;

impl Crypto {
    pub(crate) fn sign(secret_key: &SecretKey, message: &[u8]) -> Signature {
        let secp = Secp256k1::signing_only();
        let digest = Message::from_digest(*Hash256::hash(message).as_bytes());

        Signature::from_secp256k1(secp.sign_ecdsa(&digest, secret_key))
    }

    /// Verifies `signature` over SHA-256(`message`) under `public_key`.
    ///
    /// Total: malformed keys or signatures verify as `false`.
    pub fn verify_signature(public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        let public_key = match Secp256k1PublicKey::from_slice(public_key.to_bytes()) {
            Ok(key) => key,
            Err(_) => return false,
        };

        let signature = match Secp256k1Signature::from_compact(signature) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        let secp = Secp256k1::verification_only();
        let digest = Message::from_digest(*Hash256::hash(message).as_bytes());

        secp.verify_ecdsa(&digest, &signature, &public_key).is_ok()
    }
}
