//! Table storage for snapdb
//!
//! A table owns its schema and an insertion-ordered list of rows. Every
//! row has exactly one value per schema column at all times.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::warn;

use super::value::{Row, Value};
use crate::catalog::{ColumnType, Schema};
use crate::error::{Error, Result};
use crate::sql::ast::{Assignment, CompareOp, Predicate, Projection};

/// Outcome of a schema alteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    /// The schema (and every row) was changed
    Applied,
    /// Nothing changed; carries the warning to report
    Unchanged(String),
}

impl SchemaChange {
    /// Warning message of a skipped alteration
    pub fn warning(&self) -> Option<&str> {
        match self {
            SchemaChange::Applied => None,
            SchemaChange::Unchanged(message) => Some(message),
        }
    }
}

/// Projected query output: column names plus rows in the same layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// A predicate resolved against a schema
#[derive(Debug, Clone)]
struct BoundPredicate {
    index: usize,
    op: CompareOp,
    value: Value,
}

impl BoundPredicate {
    fn matches(&self, row: &Row) -> bool {
        row.get(self.index)
            .is_some_and(|cell| cell.matches(self.op, &self.value))
    }
}

/// Lazy iterator over the rows of a table that satisfy a predicate.
///
/// Clone it to restart from the same position.
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    rows: std::slice::Iter<'a, Row>,
    filter: Option<BoundPredicate>,
}

impl<'a> Iterator for Scan<'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = &self.filter;
        self.rows
            .find(|row| filter.as_ref().map_or(true, |p| p.matches(row)))
    }
}

/// A table combining schema and rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name
    name: String,
    /// Ordered column declarations
    schema: Schema,
    /// Rows in insertion order
    rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
        }
    }

    /// Get table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get table schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get all rows in insertion order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.schema
            .get_column_index(column)
            .ok_or_else(|| Error::unknown_column(column, &self.name))
    }

    fn bind(&self, predicate: Option<&Predicate>) -> Result<Option<BoundPredicate>> {
        predicate
            .map(|p| {
                Ok(BoundPredicate {
                    index: self.column_index(&p.column)?,
                    op: p.op,
                    value: p.value.clone(),
                })
            })
            .transpose()
    }

    /// Check the row-length invariant (used after loading from disk)
    pub(crate) fn validate(&self) -> Result<()> {
        let expected = self.schema.column_count();
        match self.rows.iter().find(|row| row.len() != expected) {
            Some(row) => Err(Error::ArityMismatch {
                expected,
                found: row.len(),
            }),
            None => Ok(()),
        }
    }

    // ========== Reads ==========

    /// Scan rows matching `predicate` (all rows if `None`).
    ///
    /// The predicate column is resolved before the scan starts.
    pub fn scan(&self, predicate: Option<&Predicate>) -> Result<Scan<'_>> {
        Ok(Scan {
            rows: self.rows.iter(),
            filter: self.bind(predicate)?,
        })
    }

    /// Map rows onto the requested columns, in requested order
    pub fn project<'a>(
        &self,
        rows: impl IntoIterator<Item = &'a Row>,
        projection: &Projection,
    ) -> Result<RowSet> {
        let (columns, indices) = match projection {
            Projection::Wildcard => (
                self.schema.column_names(),
                (0..self.schema.column_count()).collect::<Vec<_>>(),
            ),
            Projection::Columns(names) => {
                let indices = names
                    .iter()
                    .map(|name| self.column_index(name))
                    .collect::<Result<Vec<_>>>()?;
                (names.clone(), indices)
            }
        };

        let rows = rows
            .into_iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(RowSet { columns, rows })
    }

    // ========== Writes ==========

    /// Insert a full row in schema order, coercing each value
    pub fn insert_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.schema.column_count() {
            return Err(Error::ArityMismatch {
                expected: self.schema.column_count(),
                found: row.len(),
            });
        }

        let converted = row
            .into_iter()
            .zip(self.schema.columns())
            .map(|(value, (column, column_type))| value.coerce(column, column_type))
            .collect::<Result<Row>>()?;

        self.rows.push(converted);
        Ok(())
    }

    /// Insert values, either positionally or by column name.
    ///
    /// With a column list, columns not named receive NULL.
    pub fn insert(&mut self, columns: Option<&[String]>, values: Vec<Value>) -> Result<()> {
        let row = match columns {
            None => values,
            Some(columns) => {
                if columns.len() != values.len() {
                    return Err(Error::ArityMismatch {
                        expected: columns.len(),
                        found: values.len(),
                    });
                }
                let mut row = vec![Value::Null; self.schema.column_count()];
                for (column, value) in columns.iter().zip(values) {
                    let index = self.column_index(column)?;
                    row[index] = value;
                }
                row
            }
        };

        self.insert_row(row)
    }

    /// Apply assignments to every matching row, returning the count touched.
    ///
    /// Target columns, new values and the predicate are all checked before
    /// any row is modified.
    pub fn update_rows(
        &mut self,
        assignments: &[Assignment],
        predicate: Option<&Predicate>,
    ) -> Result<usize> {
        let mut resolved = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let index = self.column_index(&assignment.column)?;
            resolved.push(index);
        }

        let mut updates = Vec::with_capacity(assignments.len());
        for (assignment, &index) in assignments.iter().zip(&resolved) {
            let column_type = self
                .schema
                .get_column_type(&assignment.column)
                .ok_or_else(|| Error::unknown_column(&assignment.column, &self.name))?;
            let value = assignment
                .value
                .clone()
                .coerce(&assignment.column, column_type)?;
            updates.push((index, value));
        }

        let filter = self.bind(predicate)?;

        let mut count = 0;
        for row in self.rows.iter_mut() {
            if filter.as_ref().map_or(true, |p| p.matches(row)) {
                for (index, value) in &updates {
                    row[*index] = value.clone();
                }
                count += 1;
            }
        }

        Ok(count)
    }

    /// Remove every matching row, returning the count removed
    pub fn delete_rows(&mut self, predicate: Option<&Predicate>) -> Result<usize> {
        let before = self.rows.len();

        match self.bind(predicate)? {
            Some(filter) => self.rows.retain(|row| !filter.matches(row)),
            None => self.rows.clear(),
        }

        Ok(before - self.rows.len())
    }

    // ========== Schema changes ==========

    /// Append a column; existing rows get NULL in the new slot
    pub fn add_column(&mut self, column: &str, column_type: ColumnType) -> SchemaChange {
        if !self.schema.add_column(column, column_type) {
            let message = format!(
                "column '{}' already exists in table '{}'",
                column, self.name
            );
            warn!(table = %self.name, column, "{}", message);
            return SchemaChange::Unchanged(message);
        }

        for row in self.rows.iter_mut() {
            row.push(Value::Null);
        }
        SchemaChange::Applied
    }

    /// Remove a column and its slot from every row
    pub fn drop_column(&mut self, column: &str) -> SchemaChange {
        let Some(index) = self.schema.remove_column(column) else {
            return self.missing_column(column);
        };

        for row in self.rows.iter_mut() {
            row.remove(index);
        }
        SchemaChange::Applied
    }

    /// Change the declared type of a column.
    ///
    /// Stored values are left as they are; the new type applies to later writes.
    pub fn modify_column(&mut self, column: &str, column_type: ColumnType) -> SchemaChange {
        if self.schema.set_column_type(column, column_type) {
            SchemaChange::Applied
        } else {
            self.missing_column(column)
        }
    }

    fn missing_column(&self, column: &str) -> SchemaChange {
        let message = format!(
            "column '{}' does not exist in table '{}'",
            column, self.name
        );
        warn!(table = %self.name, column, "{}", message);
        SchemaChange::Unchanged(message)
    }

    /// Human-readable schema description
    pub fn describe(&self) -> String {
        let mut info = format!("Table: {}\n", self.name);
        info.push_str("Columns:\n");
        for (name, column_type) in self.schema.columns() {
            let _ = writeln!(info, "  {} {}", name, column_type);
        }
        let _ = writeln!(info, "Rows: {}", self.rows.len());
        info
    }
}
