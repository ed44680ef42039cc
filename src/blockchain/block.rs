use serde::{Deserialize, Serialize};

use crate::hash::sha256_hex;
use crate::transaction::Transaction;

/// Proof-of-work seal: the nonce found by the miner and the hash it yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seal {
    pub nonce: u64,
    pub hash: String,
}

/// An ordered batch of transactions linked to its predecessor. Unsealed
/// until the miner attaches a `Seal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub transactions: Vec<Transaction>,
    pub previous_hash: Option<String>,
    pub seal: Option<Seal>,
}

impl Block {
    /// Create the genesis block: no transactions, no predecessor, sealed with
    /// nonce 0 and no proof-of-work requirement.
    pub fn genesis() -> Self {
        Self::new(Vec::new(), None).sealed_with(0)
    }

    /// Create a new block (not mined yet).
    pub fn new(transactions: Vec<Transaction>, previous_hash: Option<String>) -> Self {
        Self {
            transactions,
            previous_hash,
            seal: None,
        }
    }

    /// Hash this block would have with `nonce`. Transactions are serialized
    /// as JSON, which is deterministic for these types.
    pub fn calculate_hash(&self, nonce: u64) -> String {
        let txs_json = serde_json::to_string(&self.transactions).expect("serialize txs");
        let preimage = format!(
            "{}:{}:{}",
            txs_json,
            self.previous_hash.as_deref().unwrap_or(""),
            nonce
        );
        sha256_hex(preimage.as_bytes())
    }

    /// Attach `nonce` and its hash.
    pub fn sealed_with(self, nonce: u64) -> Self {
        let hash = self.calculate_hash(nonce);
        self.sealed(Seal { nonce, hash })
    }

    pub fn sealed(mut self, seal: Seal) -> Self {
        self.seal = Some(seal);
        self
    }

    pub fn is_sealed(&self) -> bool {
        self.seal.is_some()
    }

    pub fn nonce(&self) -> Option<u64> {
        self.seal.as_ref().map(|s| s.nonce)
    }

    pub fn hash(&self) -> Option<&str> {
        self.seal.as_ref().map(|s| s.hash.as_str())
    }

    /// True if the stored hash is exactly what the contents and nonce give.
    pub fn has_consistent_hash(&self) -> bool {
        match &self.seal {
            Some(seal) => seal.hash == self.calculate_hash(seal.nonce),
            None => false,
        }
    }
}
