//! Statement execution module

pub mod executor;

pub use executor::{ExecutionEngine, QueryResult};
