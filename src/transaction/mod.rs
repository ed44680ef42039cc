pub mod model;

pub use model::{Transaction, is_valid_transaction};
