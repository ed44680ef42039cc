pub mod block;
pub mod miner;
pub mod model;
pub mod shared;
pub mod validation;

pub use block::{Block, Seal};
pub use miner::MiningControl;
pub use model::Chain;
pub use shared::SharedChain;
pub use validation::{Balances, is_valid_block, is_valid_chain, validate_chain};
