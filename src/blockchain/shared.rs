use log::debug;
use std::sync::Mutex;

use super::block::Block;
use super::miner::{self, MiningControl};
use super::model::Chain;
use super::validation::{self, Balances};
use crate::error::{ChainError, ValidationError};
use crate::transaction::Transaction;
use crate::wallet::Wallet;

/// Thread-safe handle over a `Chain`.
///
/// Mines run one at a time. The nonce search happens outside the chain lock,
/// so submissions keep flowing while a block is being mined; they land in the
/// next block. Snapshot and commit each happen under the chain lock.
#[derive(Debug, Default)]
pub struct SharedChain {
    chain: Mutex<Chain>,
    mining: Mutex<()>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain: Mutex::new(chain),
            mining: Mutex::new(()),
        }
    }

    pub fn add_transaction(&self, tx: Transaction) {
        self.chain.lock().expect("mutex poisoned").add_transaction(tx);
    }

    pub fn add_block(&self, block: Block) -> Result<(), ChainError> {
        self.chain.lock().expect("mutex poisoned").add_block(block)
    }

    pub fn mine(&self, miner: &Wallet) -> Result<Block, ChainError> {
        let control = {
            let chain = self.chain.lock().expect("mutex poisoned");
            MiningControl::for_config(chain.config())
        };
        self.mine_with(miner, &control)
    }

    /// Returns a copy of the block that was appended.
    pub fn mine_with(&self, miner: &Wallet, control: &MiningControl) -> Result<Block, ChainError> {
        let _turn = self.mining.lock().expect("mutex poisoned");

        // snapshot pending + head
        let (candidate, included, difficulty) = {
            let chain = self.chain.lock().expect("mutex poisoned");
            let (candidate, included) = chain.prepare_block(miner);
            (candidate, included, chain.difficulty())
        };
        debug!("MINER - searching with {included} pending txs (diff={difficulty})");

        let seal = miner::search(&candidate, difficulty, control)?;

        let mut chain = self.chain.lock().expect("mutex poisoned");
        let block = chain.commit(candidate.sealed(seal), included)?.clone();
        Ok(block)
    }

    pub fn len(&self) -> usize {
        self.chain.lock().expect("mutex poisoned").len()
    }

    pub fn pending_len(&self) -> usize {
        self.chain.lock().expect("mutex poisoned").pending_transactions().len()
    }

    /// Copy of the current chain state.
    pub fn snapshot(&self) -> Chain {
        self.chain.lock().expect("mutex poisoned").clone()
    }

    pub fn validate(&self) -> Result<Balances, ValidationError> {
        let chain = self.chain.lock().expect("mutex poisoned");
        validation::validate_chain(&chain)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn concurrent_submissions_are_never_lost_or_duplicated() {
        let _ = env_logger::builder().is_test(true).try_init();
        let shared = SharedChain::new(Chain::new(ChainConfig::new(1, 5).unwrap()));
        let miner = Wallet::generate();

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..10 {
                        let payer = Wallet::generate();
                        shared.add_transaction(Transaction::new(&payer, Some("sink"), 0));
                    }
                });
            }
            for _ in 0..2 {
                s.spawn(|| {
                    for _ in 0..3 {
                        shared.mine(&miner).unwrap();
                    }
                });
            }
        });
        shared.mine(&miner).unwrap();

        let chain = shared.snapshot();
        assert_eq!(chain.len(), 1 + 6 + 1);
        assert_eq!(shared.pending_len(), 0);

        let mut seen = HashSet::new();
        let mut transfers = 0;
        for block in &chain.blocks()[1..] {
            assert_eq!(block.transactions.iter().filter(|t| t.is_reward()).count(), 1);
            assert!(block.transactions.last().unwrap().is_reward());
            for tx in block.transactions.iter().filter(|t| !t.is_reward()) {
                assert!(seen.insert(tx.signature.clone()));
                transfers += 1;
            }
        }
        assert_eq!(transfers, 40);
        assert!(shared.is_valid());
    }

    #[test]
    fn direct_insertion_is_refused() {
        let shared = SharedChain::default();
        assert_eq!(
            shared.add_block(Block::genesis()),
            Err(ChainError::DirectInsertion)
        );
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn failed_mine_keeps_pending() {
        let shared = SharedChain::new(Chain::new(
            ChainConfig::new(12, 5).unwrap().with_max_nonce_attempts(2),
        ));
        let miner = Wallet::generate();
        shared.add_transaction(Transaction::reward(&miner, 5));
        assert!(shared.mine(&miner).is_err());
        assert_eq!(shared.pending_len(), 1);
        assert_eq!(shared.len(), 1);
    }
}
