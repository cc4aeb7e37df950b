//! Value and Row types for snapdb
//!
//! This module defines how cell values are represented in memory, how they
//! are coerced to a column's declared type and how predicates compare them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::catalog::ColumnType;
use crate::error::{Error, Result};
use crate::sql::ast::CompareOp;

/// A row is one value per schema column, positionally aligned
pub type Row = Vec<Value>;

/// A value in the database
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Integer value (64-bit)
    Integer(i64),
    /// Text value
    Text(String),
}

impl Value {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of this value, parsing text when it holds an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Text(s) => s.parse().ok(),
            Value::Null => None,
        }
    }

    /// Text form of a non-null value
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Integer(i) => Some(i.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Null => None,
        }
    }

    /// Coerce a raw value to the declared type of `column`.
    ///
    /// NULL passes through unchanged. INTEGER columns accept integers and
    /// text that parses as an integer; every other type stores the text form.
    pub fn coerce(self, column: &str, column_type: &ColumnType) -> Result<Value> {
        match (self, column_type) {
            (Value::Null, _) => Ok(Value::Null),
            (Value::Integer(i), ColumnType::Integer) => Ok(Value::Integer(i)),
            (Value::Text(s), ColumnType::Integer) => match s.parse::<i64>() {
                Ok(i) => Ok(Value::Integer(i)),
                Err(_) => Err(Error::InvalidValue {
                    column: column.to_string(),
                    value: s,
                }),
            },
            (Value::Integer(i), _) => Ok(Value::Text(i.to_string())),
            (Value::Text(s), _) => Ok(Value::Text(s)),
        }
    }

    /// Compare a stored cell against a predicate literal.
    ///
    /// Both sides numeric: integer ordering. Otherwise text ordering.
    /// NULL on either side is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        if self.is_null() || other.is_null() {
            return None;
        }
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => Some(self.as_text()?.cmp(&other.as_text()?)),
        }
    }

    /// Evaluate `self <op> literal`
    pub fn matches(&self, op: CompareOp, literal: &Value) -> bool {
        match self.compare(literal) {
            Some(ordering) => match op {
                CompareOp::Eq => ordering == Ordering::Equal,
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Gt => ordering == Ordering::Greater,
            },
            None => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}
