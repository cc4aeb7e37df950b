//! Schema definitions for snapdb
//!
//! A schema is the ordered list of a table's columns and their declared types.

use super::types::ColumnType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column definition in a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Table schema - ordered, uniquely named columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: IndexMap<String, ColumnType>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema from a list of columns.
    ///
    /// A later column with an already used name replaces the earlier type
    /// in place; the parser rejects such lists before they get here.
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|c| (c.name, c.column_type))
                .collect(),
        }
    }

    /// Append a column. Returns false if the name is already taken.
    pub fn add_column(&mut self, name: impl Into<String>, column_type: ColumnType) -> bool {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return false;
        }
        self.columns.insert(name, column_type);
        true
    }

    /// Remove a column, returning its former position
    pub fn remove_column(&mut self, name: &str) -> Option<usize> {
        let (index, _, _) = self.columns.shift_remove_full(name)?;
        Some(index)
    }

    /// Change the declared type of a column. Returns false if absent.
    pub fn set_column_type(&mut self, name: &str, column_type: ColumnType) -> bool {
        match self.columns.get_mut(name) {
            Some(ty) => {
                *ty = column_type;
                true
            }
            None => false,
        }
    }

    /// Get column position by name
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Get declared type by name
    pub fn get_column_type(&self, name: &str) -> Option<&ColumnType> {
        self.columns.get(name)
    }

    /// Iterate columns in declaration order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnType)> {
        self.columns.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get column names in declaration order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }
}
