//! Parsed commands
//!
//! This module defines the typed commands the parser produces and the
//! executor consumes.

use std::str::FromStr;

use crate::catalog::ColumnType;
use crate::error::Error;
use crate::storage::Value;

/// A parsed statement
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// CREATE TABLE name (col type, ...)
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
    },
    /// INSERT INTO name [(col, ...)] VALUES (v, ...)
    Insert {
        table: String,
        columns: Option<Vec<String>>,
        values: Vec<Value>,
    },
    /// SELECT cols|* FROM name [WHERE ...]
    Select {
        table: String,
        projection: Projection,
        predicate: Option<Predicate>,
    },
    /// UPDATE name SET col = v, ... [WHERE ...]
    Update {
        table: String,
        assignments: Vec<Assignment>,
        predicate: Option<Predicate>,
    },
    /// DELETE FROM name [WHERE ...]
    Delete {
        table: String,
        predicate: Option<Predicate>,
    },
    /// ALTER TABLE name ADD|DROP|MODIFY COLUMN ...
    Alter {
        table: String,
        operation: AlterOperation,
    },
    /// DROP TABLE name
    DropTable { name: String },
    /// BEGIN [TRANSACTION]
    Begin,
    /// COMMIT
    Commit,
    /// ROLLBACK
    Rollback,
}

impl Command {
    /// Statement shape, as used in messages and logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateTable { .. } => "CREATE TABLE",
            Command::Insert { .. } => "INSERT",
            Command::Select { .. } => "SELECT",
            Command::Update { .. } => "UPDATE",
            Command::Delete { .. } => "DELETE",
            Command::Alter { .. } => "ALTER TABLE",
            Command::DropTable { .. } => "DROP TABLE",
            Command::Begin => "BEGIN TRANSACTION",
            Command::Commit => "COMMIT",
            Command::Rollback => "ROLLBACK",
        }
    }
}

/// Column definition in CREATE TABLE / ALTER TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

/// Requested SELECT columns
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// All columns (*) in schema order
    Wildcard,
    /// Named columns in requested order
    Columns(Vec<String>),
}

/// Column assignment (for UPDATE)
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

/// Schema change requested by ALTER TABLE
#[derive(Debug, Clone, PartialEq)]
pub enum AlterOperation {
    AddColumn { name: String, column_type: ColumnType },
    DropColumn { name: String },
    ModifyColumn { name: String, column_type: ColumnType },
}

/// Comparison operator of a WHERE clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
}

impl FromStr for CompareOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(CompareOp::Eq),
            "<" => Ok(CompareOp::Lt),
            ">" => Ok(CompareOp::Gt),
            other => Err(Error::UnsupportedOperator(other.to_string())),
        }
    }
}

/// A single `column op literal` comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}
