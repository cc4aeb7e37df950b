//! Storage module
//!
//! This module contains the in-memory storage components:
//! - Values and rows
//! - Tables with schema-aligned rows
//! - The table store with snapshot and JSON persistence

pub mod store;
pub mod table;
pub mod value;

pub use store::{Snapshot, Store};
pub use table::{RowSet, Scan, SchemaChange, Table};
pub use value::{Row, Value};
