use log::warn;
use std::env;

use crate::error::ConfigError;
use crate::hash::DIGEST_HEX_LEN;

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Amount minted to the miner of every block.
pub const DEFAULT_REWARD: i64 = 5;

/// Highest difficulty a 64 digit hex hash can satisfy.
pub const MAX_DIFFICULTY: u32 = DIGEST_HEX_LEN as u32;

/// Chain-wide policy read by mining and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    difficulty: u32,
    reward: i64,
    max_nonce_attempts: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            reward: DEFAULT_REWARD,
            max_nonce_attempts: None,
        }
    }
}

impl ChainConfig {
    pub fn new(difficulty: u32, reward: i64) -> Result<Self, ConfigError> {
        if difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::DifficultyTooHigh {
                difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        if reward < 0 {
            return Err(ConfigError::NegativeReward(reward));
        }
        Ok(Self {
            difficulty,
            reward,
            max_nonce_attempts: None,
        })
    }

    /// Cap the nonce search performed by `Chain::mine`.
    pub fn with_max_nonce_attempts(mut self, attempts: u64) -> Self {
        self.max_nonce_attempts = Some(attempts);
        self
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn reward(&self) -> i64 {
        self.reward
    }

    pub fn max_nonce_attempts(&self) -> Option<u64> {
        self.max_nonce_attempts
    }

    /// Load from the process environment (and `.env`, if present):
    /// `CHAIN_DIFFICULTY`, `CHAIN_REWARD`, `CHAIN_MAX_NONCE_ATTEMPTS`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reading through `lookup`. Bad values fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let difficulty = lookup("CHAIN_DIFFICULTY")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|d| *d <= MAX_DIFFICULTY);
        let reward = lookup("CHAIN_REWARD")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|r| *r >= 0);
        let max_nonce_attempts = lookup("CHAIN_MAX_NONCE_ATTEMPTS")
            .and_then(|v| v.trim().parse::<u64>().ok());

        if difficulty.is_none() && lookup("CHAIN_DIFFICULTY").is_some() {
            warn!("CHAIN_DIFFICULTY invalid, using {DEFAULT_DIFFICULTY}");
        }
        if reward.is_none() && lookup("CHAIN_REWARD").is_some() {
            warn!("CHAIN_REWARD invalid, using {DEFAULT_REWARD}");
        }

        Self {
            difficulty: difficulty.unwrap_or(DEFAULT_DIFFICULTY),
            reward: reward.unwrap_or(DEFAULT_REWARD),
            max_nonce_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ChainConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg, ChainConfig::default());
        assert_eq!(cfg.difficulty(), 2);
        assert_eq!(cfg.reward(), 5);
        assert_eq!(cfg.max_nonce_attempts(), None);
    }

    #[test]
    fn reads_all_keys() {
        let cfg = ChainConfig::from_lookup(lookup_from(&[
            ("CHAIN_DIFFICULTY", "3"),
            ("CHAIN_REWARD", " 12 "),
            ("CHAIN_MAX_NONCE_ATTEMPTS", "1000"),
        ]));
        assert_eq!(cfg.difficulty(), 3);
        assert_eq!(cfg.reward(), 12);
        assert_eq!(cfg.max_nonce_attempts(), Some(1000));
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let cfg = ChainConfig::from_lookup(lookup_from(&[
            ("CHAIN_DIFFICULTY", "65"),
            ("CHAIN_REWARD", "-1"),
            ("CHAIN_MAX_NONCE_ATTEMPTS", "lots"),
        ]));
        assert_eq!(cfg, ChainConfig::default());
    }

    #[test]
    fn new_rejects_bad_policy() {
        assert_eq!(
            ChainConfig::new(65, 5),
            Err(ConfigError::DifficultyTooHigh {
                difficulty: 65,
                max: 64
            })
        );
        assert_eq!(ChainConfig::new(1, -5), Err(ConfigError::NegativeReward(-5)));
        assert!(ChainConfig::new(64, 0).is_ok());
    }
}
