use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::block::{Block, Seal};
use crate::config::{ChainConfig, MAX_DIFFICULTY};
use crate::error::MiningError;

/// How many hash attempts pass between looks at the cancel flag.
const CANCEL_CHECK_INTERVAL: u64 = 256;

/// Limits for a nonce search. The default searches until success.
#[derive(Debug, Clone, Default)]
pub struct MiningControl {
    max_attempts: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl MiningControl {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounded by the config's `max_nonce_attempts`, if any.
    pub fn for_config(config: &ChainConfig) -> Self {
        Self {
            max_attempts: config.max_nonce_attempts(),
            cancel: None,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u64) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Stop the search once `flag` becomes true.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// True if `hash` starts with `difficulty` hex zeros.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let zeros = difficulty as usize;
    hash.len() >= zeros && hash.bytes().take(zeros).all(|c| c == b'0')
}

/// Linear nonce search from 0 for a hash with `difficulty` leading zeros.
/// The block itself is not touched; the winning nonce and hash are returned.
pub fn search(block: &Block, difficulty: u32, control: &MiningControl) -> Result<Seal, MiningError> {
    if difficulty > MAX_DIFFICULTY {
        return Err(MiningError::DifficultyOutOfRange { difficulty });
    }

    let mut nonce: u64 = 0;
    let mut attempts: u64 = 0;
    loop {
        if control.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(MiningError::Exhausted { attempts });
        }
        if attempts % CANCEL_CHECK_INTERVAL == 0 && control.is_cancelled() {
            return Err(MiningError::Cancelled { attempts });
        }

        let hash = block.calculate_hash(nonce);
        attempts += 1;
        if meets_difficulty(&hash, difficulty) {
            debug!("POW - nonce={nonce} found after {attempts} attempts (diff={difficulty})");
            return Ok(Seal { nonce, hash });
        }

        nonce = match nonce.checked_add(1) {
            Some(n) => n,
            None => return Err(MiningError::Exhausted { attempts }),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;
    use crate::wallet::Wallet;

    fn candidate() -> Block {
        let miner = Wallet::generate();
        Block::new(vec![Transaction::reward(&miner, 5)], Some("prev".into()))
    }

    #[test]
    fn prefix_predicate() {
        assert!(meets_difficulty("00ab", 2));
        assert!(meets_difficulty("00ab", 0));
        assert!(!meets_difficulty("0a0b", 2));
        assert!(!meets_difficulty("00", 3));
    }

    #[test]
    fn mining_produces_leading_zeros() {
        let b = candidate();
        let seal = search(&b, 2, &MiningControl::unbounded()).unwrap();
        assert!(seal.hash.starts_with("00"));
        assert_eq!(seal.hash, b.calculate_hash(seal.nonce));
    }

    #[test]
    fn finds_the_first_matching_nonce() {
        let b = candidate();
        let seal = search(&b, 1, &MiningControl::unbounded()).unwrap();
        for earlier in 0..seal.nonce {
            assert!(!b.calculate_hash(earlier).starts_with('0'));
        }
    }

    #[test]
    fn zero_difficulty_accepts_nonce_zero() {
        let b = candidate();
        let seal = search(&b, 0, &MiningControl::unbounded()).unwrap();
        assert_eq!(seal.nonce, 0);
    }

    #[test]
    fn attempt_cap_stops_search() {
        let b = candidate();
        let control = MiningControl::unbounded().with_max_attempts(5);
        assert_eq!(
            search(&b, 12, &control),
            Err(MiningError::Exhausted { attempts: 5 })
        );
    }

    #[test]
    fn raised_flag_cancels_before_hashing() {
        let b = candidate();
        let flag = Arc::new(AtomicBool::new(true));
        let control = MiningControl::unbounded().with_cancel_flag(flag);
        assert_eq!(
            search(&b, 12, &control),
            Err(MiningError::Cancelled { attempts: 0 })
        );
    }

    #[test]
    fn impossible_difficulty_is_rejected() {
        let b = candidate();
        assert_eq!(
            search(&b, 65, &MiningControl::unbounded()),
            Err(MiningError::DifficultyOutOfRange { difficulty: 65 })
        );
    }
}
