use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};
use std::fmt;

use crate::error::WalletError;
use crate::hash::sha256;

/// A secp256k1 keypair. The public identity used throughout the ledger is
/// the hex of the compressed (33 byte) public key.
#[derive(Clone)]
pub struct Wallet {
    secret: SecretKey,
    public: PublicKey,
}

impl Wallet {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret, public) = secp.generate_keypair(&mut OsRng);
        Self { secret, public }
    }

    /// Import a 32 byte secret key given as hex.
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, WalletError> {
        let bytes = hex::decode(secret_hex.trim()).map_err(|_| WalletError::InvalidHex)?;
        let secret = SecretKey::from_slice(&bytes).map_err(|_| WalletError::InvalidSecretKey)?;
        let secp = Secp256k1::signing_only();
        let public = PublicKey::from_secret_key(&secp, &secret);
        Ok(Self { secret, public })
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret.secret_bytes())
    }

    /// Public identity (66 hex chars).
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public.serialize())
    }

    /// Deterministic (RFC 6979) ECDSA signature over SHA-256 of `message`,
    /// returned as 128 hex chars in compact form.
    pub fn sign(&self, message: &[u8]) -> String {
        let secp = Secp256k1::signing_only();
        let msg = Message::from_digest(sha256(message));
        let sig = secp.sign_ecdsa(&msg, &self.secret);
        hex::encode(sig.serialize_compact())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("public", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// Verify a compact hex signature made by `pubkey_hex` over `message`.
pub fn verify_signature_hex(
    pubkey_hex: &str,
    message: &[u8],
    sig_hex: &str,
) -> Result<bool, WalletError> {
    let secp = Secp256k1::verification_only();

    let sig_bytes = hex::decode(sig_hex).map_err(|_| WalletError::InvalidHex)?;
    let sig = Signature::from_compact(&sig_bytes).map_err(|_| WalletError::InvalidSignature)?;

    let pk_bytes = hex::decode(pubkey_hex).map_err(|_| WalletError::InvalidHex)?;
    let pk = PublicKey::from_slice(&pk_bytes).map_err(|_| WalletError::InvalidPublicKey)?;

    let msg = Message::from_digest(sha256(message));
    Ok(secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
}
