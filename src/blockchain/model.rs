use log::{debug, info, warn};

use super::block::Block;
use super::miner::{self, MiningControl};
use super::validation::{self, Balances};
use crate::config::ChainConfig;
use crate::error::{ChainError, ValidationError};
use crate::transaction::Transaction;
use crate::wallet::Wallet;

/// In-memory proof-of-work chain with a buffer of pending transactions.
/// Blocks only grow through `mine`.
#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) blocks: Vec<Block>,
    pub(crate) pending: Vec<Transaction>,
    config: ChainConfig,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new(ChainConfig::default())
    }
}

impl Chain {
    /// Initialize a new chain holding only the genesis block.
    pub fn new(config: ChainConfig) -> Self {
        Self {
            blocks: vec![Block::genesis()],
            pending: Vec::new(),
            config,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Return the last block in the chain.
    pub fn head(&self) -> &Block {
        self.blocks
            .last()
            .expect("Chain should always have at least the genesis block")
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty()
    }

    pub fn reward(&self) -> i64 {
        self.config.reward()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    /// Queue a transaction for the next block. Nothing is checked here.
    pub fn add_transaction(&mut self, tx: Transaction) {
        debug!(
            "PENDING - tx {} -> {} amount={} (pending={})",
            tx.source.as_deref().unwrap_or("<mint>"),
            tx.recipient,
            tx.amount,
            self.pending.len() + 1
        );
        self.pending.push(tx);
    }

    /// Blocks cannot be inserted directly; always fails.
    pub fn add_block(&mut self, _block: Block) -> Result<(), ChainError> {
        warn!("rejected direct block insertion at height {}", self.len());
        Err(ChainError::DirectInsertion)
    }

    /// Mine all pending transactions plus a reward for `miner` into a new
    /// block. The search is bounded only by the configured max attempts.
    pub fn mine(&mut self, miner: &Wallet) -> Result<&Block, ChainError> {
        let control = MiningControl::for_config(&self.config);
        self.mine_with(miner, &control)
    }

    /// Like `mine`, with an explicit attempt cap and/or cancel flag. On
    /// failure the chain and its pending buffer are left untouched.
    pub fn mine_with(
        &mut self,
        miner: &Wallet,
        control: &MiningControl,
    ) -> Result<&Block, ChainError> {
        let (candidate, included) = self.prepare_block(miner);
        let seal = miner::search(&candidate, self.difficulty(), control)?;
        self.commit(candidate.sealed(seal), included)
    }

    /// Build the unsealed candidate: pending transactions followed by the
    /// reward, linked to the current head. Also returns how many pending
    /// transactions it took.
    pub(crate) fn prepare_block(&self, miner: &Wallet) -> (Block, usize) {
        let mut transactions = Vec::with_capacity(self.pending.len() + 1);
        transactions.extend(self.pending.iter().cloned());
        transactions.push(Transaction::reward(miner, self.reward()));
        let previous_hash = self.head().hash().map(str::to_string);
        (Block::new(transactions, previous_hash), self.pending.len())
    }

    /// Append a sealed candidate and drop the `included` pending
    /// transactions it carries, as one step.
    pub(crate) fn commit(&mut self, block: Block, included: usize) -> Result<&Block, ChainError> {
        if !block.is_sealed() {
            return Err(ChainError::Unsealed);
        }
        if block.previous_hash.as_deref() != self.head().hash() {
            return Err(ChainError::StaleBlock);
        }

        let included = included.min(self.pending.len());
        self.pending.drain(..included);
        self.blocks.push(block);

        let head = self.head();
        info!(
            "MINED block#{} hash={} nonce={} txs={} diff={}",
            self.blocks.len() - 1,
            head.hash().unwrap_or_default(),
            head.nonce().unwrap_or_default(),
            head.transactions.len(),
            self.difficulty()
        );
        Ok(head)
    }

    /// Full validation walk; see `validation::validate_chain`.
    pub fn validate(&self) -> Result<Balances, ValidationError> {
        validation::validate_chain(self)
    }

    pub fn is_valid(&self) -> bool {
        validation::is_valid_chain(self)
    }
}
