//! snapdb - A minimal in-memory relational query engine written in Rust
//!
//! This library provides:
//! - SQL parsing (lexer, parser, commands)
//! - In-memory table storage with JSON snapshot files
//! - Snapshot-based transactions (BEGIN / COMMIT / ROLLBACK)
//! - Statement execution
//!
//! ```no_run
//! use snapdb::ExecutionEngine;
//!
//! let mut engine = ExecutionEngine::new();
//! engine.execute_sql("CREATE TABLE users (id INT, name TEXT)")?;
//! engine.execute_sql("INSERT INTO users VALUES (1, 'Alice')")?;
//! println!("{}", engine.execute_sql("SELECT * FROM users")?);
//! # Ok::<(), snapdb::Error>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod sql;
pub mod storage;
pub mod transaction;

pub use config::ShellConfig;
pub use error::{Error, ErrorKind, Result};
pub use executor::{ExecutionEngine, QueryResult};
pub use storage::Store;
