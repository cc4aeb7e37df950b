//! Column types for snapdb
//!
//! This module defines the column types a table schema can declare.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Signed 64-bit integer (`INT` / `INTEGER`)
    Integer,
    /// Free-form text (`TEXT`)
    Text,
    /// Any other type tag, stored upper-cased and treated like text
    Custom(String),
}

impl ColumnType {
    /// Canonicalize a type name as written in a statement
    pub fn from_name(name: &str) -> Self {
        match name.to_uppercase().as_str() {
            "INT" | "INTEGER" => ColumnType::Integer,
            "TEXT" => ColumnType::Text,
            other => ColumnType::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::Text => write!(f, "TEXT"),
            ColumnType::Custom(tag) => write!(f, "{}", tag),
        }
    }
}
