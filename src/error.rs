use thiserror::Error;

/// Key material could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("invalid hex encoding")]
    InvalidHex,
    #[error("invalid secret key bytes")]
    InvalidSecretKey,
    #[error("invalid public key bytes")]
    InvalidPublicKey,
    #[error("invalid compact signature")]
    InvalidSignature,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("difficulty {difficulty} exceeds the {max} hex digits of a block hash")]
    DifficultyTooHigh { difficulty: u32, max: u32 },
    #[error("block reward must not be negative (got {0})")]
    NegativeReward(i64),
}

/// Reasons a nonce search stopped without sealing the block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MiningError {
    #[error("no valid nonce found after {attempts} attempts")]
    Exhausted { attempts: u64 },
    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
    #[error("difficulty {difficulty} can never be met by a 64 digit hash")]
    DifficultyOutOfRange { difficulty: u32 },
}

/// Usage errors raised by chain mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("blocks can only be added by mining")]
    DirectInsertion,
    #[error("candidate block no longer extends the chain head")]
    StaleBlock,
    #[error("candidate block is not sealed")]
    Unsealed,
    #[error(transparent)]
    Mining(#[from] MiningError),
}

/// First rule a chain broke, reported by `validate_chain`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("genesis block must have no transactions and no previous hash")]
    MalformedGenesis,
    #[error("block #{block} is not sealed")]
    Unsealed { block: usize },
    #[error("block #{block} hash does not meet difficulty {difficulty}")]
    InsufficientWork { block: usize, difficulty: u32 },
    #[error("block #{block} hash does not match its contents")]
    HashMismatch { block: usize },
    #[error("block #{block} does not link to the previous block hash")]
    BrokenLink { block: usize },
    #[error("block #{block} transaction #{tx} has a bad signature or negative amount")]
    InvalidTransaction { block: usize, tx: usize },
    #[error("block #{block} has no reward transaction")]
    MissingReward { block: usize },
    #[error("block #{block} has more than one reward transaction")]
    DuplicateReward { block: usize },
    #[error("block #{block} rewards {found}, expected {expected}")]
    WrongReward {
        block: usize,
        expected: i64,
        found: i64,
    },
    #[error("block #{block} transaction #{tx} overdraws {identity}")]
    NegativeBalance {
        block: usize,
        tx: usize,
        identity: String,
    },
}
