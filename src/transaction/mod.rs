//! Transaction module

pub mod transaction;

pub use transaction::{TransactionManager, TransactionState};
