use serde::{Deserialize, Serialize};

use crate::wallet::{Wallet, verify_signature_hex};

/// A signed value transfer. A transaction without `source` is a reward mint,
/// signed by its own recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub source: Option<String>,
    pub recipient: String,
    pub amount: i64,
    /// Hex compact ECDSA signature over `signing_message()`.
    pub signature: String,
}

impl Transaction {
    /// Build and sign a transaction with `signer`'s key.
    ///
    /// With `recipient = None` this is a reward: no source, paid to the
    /// signer. Nothing is checked here; a negative amount or a bogus
    /// recipient is only rejected by validation.
    pub fn new(signer: &Wallet, recipient: Option<&str>, amount: i64) -> Self {
        let (source, recipient) = match recipient {
            None => (None, signer.public_key_hex()),
            Some(to) => (Some(signer.public_key_hex()), to.to_string()),
        };
        let signature = signer.sign(&Self::message_for(source.as_deref(), &recipient, amount));
        Self {
            source,
            recipient,
            amount,
            signature,
        }
    }

    /// Reward transaction minting `amount` to `miner`.
    pub fn reward(miner: &Wallet, amount: i64) -> Self {
        Self::new(miner, None, amount)
    }

    pub fn is_reward(&self) -> bool {
        self.source.is_none()
    }

    /// Identity whose key must have produced `signature`.
    pub fn signer(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.recipient)
    }

    /// Canonical bytes covered by the signature: source (empty for a
    /// reward), recipient and decimal amount, concatenated.
    pub fn signing_message(&self) -> Vec<u8> {
        Self::message_for(self.source.as_deref(), &self.recipient, self.amount)
    }

    fn message_for(source: Option<&str>, recipient: &str, amount: i64) -> Vec<u8> {
        format!("{}{}{}", source.unwrap_or(""), recipient, amount).into_bytes()
    }

    pub fn has_valid_signature(&self) -> bool {
        verify_signature_hex(self.signer(), &self.signing_message(), &self.signature)
            .unwrap_or(false)
    }
}

/// A transaction is valid when its amount is non-negative and its signature
/// checks out against the signer identity.
pub fn is_valid_transaction(tx: &Transaction) -> bool {
    tx.amount >= 0 && tx.has_valid_signature()
}
