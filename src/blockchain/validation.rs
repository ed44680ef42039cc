//! Full-chain validity: structure, proof-of-work, signatures and a replay of
//! every balance. Pure: nothing here mutates the chain.

use log::warn;
use std::collections::HashMap;

use super::block::Block;
use super::miner::meets_difficulty;
use super::model::Chain;
use crate::error::ValidationError;
use crate::transaction::is_valid_transaction;

/// Final balance of every identity seen while replaying a chain.
pub type Balances = HashMap<String, i128>;

/// A block is valid on its own when it is sealed, its stored hash matches
/// its contents and every transaction is valid.
pub fn is_valid_block(block: &Block) -> bool {
    block.has_consistent_hash() && block.transactions.iter().all(is_valid_transaction)
}

/// Walk the chain once and report the first broken rule. On success the
/// replayed balances are returned.
///
/// Genesis must be empty with no predecessor and exempt from proof-of-work.
/// Every later block must be sealed with a hash that meets the chain's
/// difficulty and matches its contents, link to its predecessor's hash,
/// carry only valid transactions, and hold exactly one reward equal to the
/// chain's reward. No identity may ever go below zero.
pub fn validate_chain(chain: &Chain) -> Result<Balances, ValidationError> {
    let result = walk(chain);
    if let Err(err) = &result {
        warn!("chain rejected: {err}");
    }
    result
}

/// Boolean form of `validate_chain`.
pub fn is_valid_chain(chain: &Chain) -> bool {
    validate_chain(chain).is_ok()
}

fn walk(chain: &Chain) -> Result<Balances, ValidationError> {
    let blocks = chain.blocks();
    let difficulty = chain.difficulty();
    let reward = chain.reward();

    let genesis = blocks.first().ok_or(ValidationError::MalformedGenesis)?;
    if !genesis.transactions.is_empty() || genesis.previous_hash.is_some() {
        return Err(ValidationError::MalformedGenesis);
    }
    if !genesis.has_consistent_hash() {
        return Err(ValidationError::HashMismatch { block: 0 });
    }

    let mut balances = Balances::new();

    for (i, pair) in blocks.windows(2).enumerate() {
        let (prev, block) = (&pair[0], &pair[1]);
        let index = i + 1;

        let hash = block
            .hash()
            .ok_or(ValidationError::Unsealed { block: index })?;
        if !meets_difficulty(hash, difficulty) {
            return Err(ValidationError::InsufficientWork {
                block: index,
                difficulty,
            });
        }
        if !block.has_consistent_hash() {
            return Err(ValidationError::HashMismatch { block: index });
        }
        if block.previous_hash.is_none() || block.previous_hash.as_deref() != prev.hash() {
            return Err(ValidationError::BrokenLink { block: index });
        }

        let mut reward_found = false;
        for (j, tx) in block.transactions.iter().enumerate() {
            if !is_valid_transaction(tx) {
                return Err(ValidationError::InvalidTransaction { block: index, tx: j });
            }

            let amount = i128::from(tx.amount);
            match &tx.source {
                None => {
                    if reward_found {
                        return Err(ValidationError::DuplicateReward { block: index });
                    }
                    reward_found = true;
                    if tx.amount != reward {
                        return Err(ValidationError::WrongReward {
                            block: index,
                            expected: reward,
                            found: tx.amount,
                        });
                    }
                    *balances.entry(tx.recipient.clone()).or_insert(0) += amount;
                }
                Some(source) => {
                    let payer = balances.entry(source.clone()).or_insert(0);
                    *payer -= amount;
                    if *payer < 0 {
                        return Err(ValidationError::NegativeBalance {
                            block: index,
                            tx: j,
                            identity: source.clone(),
                        });
                    }
                    *balances.entry(tx.recipient.clone()).or_insert(0) += amount;
                }
            }
        }

        if !reward_found {
            return Err(ValidationError::MissingReward { block: index });
        }
    }

    Ok(balances)
}
