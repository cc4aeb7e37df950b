//! Error types for snapdb
//!
//! This module defines all error types used throughout the query engine.

use thiserror::Error;

/// The main error type for snapdb
#[derive(Error, Debug)]
pub enum Error {
    // ========== Parser Errors ==========
    #[error("Syntax error in {statement}: {reason}")]
    Syntax { statement: String, reason: String },

    #[error("Syntax error: unsupported operator '{0}'")]
    UnsupportedOperator(String),

    // ========== Catalog Errors ==========
    #[error("Catalog error: table '{0}' already exists")]
    DuplicateTable(String),

    #[error("Catalog error: table '{0}' does not exist")]
    UnknownTable(String),

    #[error("Catalog error: column '{column}' does not exist in table '{table}'")]
    UnknownColumn { column: String, table: String },

    // ========== Type Errors ==========
    #[error("Type error: column count doesn't match value count (expected {expected}, found {found})")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Type error: invalid value for column '{column}': {value}")]
    InvalidValue { column: String, value: String },

    // ========== Transaction Errors ==========
    #[error("Transaction error: a transaction is already in progress")]
    TransactionAlreadyOpen,

    #[error("Transaction error: no transaction in progress")]
    NoTransactionOpen,

    #[error("Transaction error: cannot {0} while a transaction is in progress")]
    RefusedInTransaction(&'static str),

    // ========== Environment Errors ==========
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Broad category of an [`Error`], used by front ends for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Catalog,
    Type,
    Transaction,
    Environment,
}

impl Error {
    /// Build a syntax error for the given statement shape
    pub fn syntax(statement: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Syntax {
            statement: statement.into(),
            reason: reason.into(),
        }
    }

    /// Build an unknown column error
    pub fn unknown_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        Error::UnknownColumn {
            column: column.into(),
            table: table.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } | Error::UnsupportedOperator(_) => ErrorKind::Syntax,
            Error::DuplicateTable(_) | Error::UnknownTable(_) | Error::UnknownColumn { .. } => {
                ErrorKind::Catalog
            }
            Error::ArityMismatch { .. } | Error::InvalidValue { .. } => ErrorKind::Type,
            Error::TransactionAlreadyOpen
            | Error::NoTransactionOpen
            | Error::RefusedInTransaction(_) => ErrorKind::Transaction,
            Error::Io(_) | Error::Serialization(_) | Error::Config(_) => ErrorKind::Environment,
        }
    }
}

/// Result type alias for snapdb operations
pub type Result<T> = std::result::Result<T, Error>;
