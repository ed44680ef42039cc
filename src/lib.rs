//! Core ledger of a minimal proof-of-work blockchain.
//!
//! Transactions are signed with secp256k1 keys, collected in a pending
//! buffer, sealed into blocks by a nonce search and checked by a full-chain
//! validator that replays every balance.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod hash;
pub mod transaction;
pub mod wallet;

pub use blockchain::{
    Balances, Block, Chain, MiningControl, Seal, SharedChain, is_valid_block, is_valid_chain,
    validate_chain,
};
pub use config::ChainConfig;
pub use error::{ChainError, ConfigError, MiningError, ValidationError, WalletError};
pub use transaction::{Transaction, is_valid_transaction};
pub use wallet::Wallet;
