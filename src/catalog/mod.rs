//! Catalog module
//!
//! This module contains schema definitions and column types.

pub mod schema;
pub mod types;

pub use schema::{Column, Schema};
pub use types::ColumnType;
