//! In-memory table store
//!
//! The store is the single owner of every table. Transactions capture and
//! restore it through [`Snapshot`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::table::{RowSet, Scan, SchemaChange, Table};
use super::value::{Row, Value};
use crate::catalog::{ColumnType, Schema};
use crate::error::{Error, Result};
use crate::sql::ast::{Assignment, Predicate, Projection};

/// Version written into snapshot files
const FORMAT_VERSION: u32 = 1;

/// Deep copy of the store's table map
#[derive(Debug, Clone)]
pub struct Snapshot {
    tables: IndexMap<String, Table>,
}

impl Snapshot {
    /// Number of tables captured
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// Store - maps table names to tables, in creation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    tables: IndexMap<String, Table>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(Error::DuplicateTable(name.to_string()));
        }
        self.tables
            .insert(name.to_string(), Table::new(name, schema));
        Ok(())
    }

    /// Drop a table
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        self.tables
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// Get a table by name
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// Check if a table exists
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// List table names in creation order
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Get table schema info as a formatted string (for .schema command)
    pub fn describe_table(&self, name: &str) -> Result<String> {
        Ok(self.table(name)?.describe())
    }

    // ========== Rows ==========

    /// Insert a full row in schema order
    pub fn insert_row(&mut self, table: &str, row: Row) -> Result<()> {
        self.table_mut(table)?.insert_row(row)
    }

    /// Insert values positionally or by column name
    pub fn insert(
        &mut self,
        table: &str,
        columns: Option<&[String]>,
        values: Vec<Value>,
    ) -> Result<()> {
        self.table_mut(table)?.insert(columns, values)
    }

    /// Lazily scan rows matching an optional predicate
    pub fn scan(&self, table: &str, predicate: Option<&Predicate>) -> Result<Scan<'_>> {
        self.table(table)?.scan(predicate)
    }

    /// Project rows of `table` onto the requested columns
    pub fn project<'a>(
        &self,
        table: &str,
        rows: impl IntoIterator<Item = &'a Row>,
        projection: &Projection,
    ) -> Result<RowSet> {
        self.table(table)?.project(rows, projection)
    }

    /// Update matching rows, returning the count touched
    pub fn update_rows(
        &mut self,
        table: &str,
        assignments: &[Assignment],
        predicate: Option<&Predicate>,
    ) -> Result<usize> {
        self.table_mut(table)?.update_rows(assignments, predicate)
    }

    /// Delete matching rows, returning the count removed
    pub fn delete_rows(&mut self, table: &str, predicate: Option<&Predicate>) -> Result<usize> {
        self.table_mut(table)?.delete_rows(predicate)
    }

    // ========== Schema ==========

    /// Append a column to a table, repairing every row
    pub fn add_column(
        &mut self,
        table: &str,
        column: &str,
        column_type: ColumnType,
    ) -> Result<SchemaChange> {
        Ok(self.table_mut(table)?.add_column(column, column_type))
    }

    /// Remove a column from a table and from every row
    pub fn drop_column(&mut self, table: &str, column: &str) -> Result<SchemaChange> {
        Ok(self.table_mut(table)?.drop_column(column))
    }

    /// Change the declared type of a column
    pub fn modify_column(
        &mut self,
        table: &str,
        column: &str,
        column_type: ColumnType,
    ) -> Result<SchemaChange> {
        Ok(self.table_mut(table)?.modify_column(column, column_type))
    }

    // ========== Snapshots ==========

    /// Deep copy of every table
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tables: self.tables.clone(),
        }
    }

    /// Replace the table map with a previously captured snapshot
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.tables = snapshot.tables;
    }

    // ========== Persistence ==========

    /// Save all tables to disk as JSON
    pub fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = StoreData {
            version: FORMAT_VERSION,
            tables: self.tables.values().collect(),
        };

        let json = serde_json::to_string_pretty(&data)?;
        std::fs::write(path.as_ref(), json)?;
        debug!(path = %path.as_ref().display(), tables = self.tables.len(), "store saved");
        Ok(())
    }

    /// Load a store from disk
    pub fn load_from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let data: StoreData<Table> = serde_json::from_str(&json)?;

        if data.version != FORMAT_VERSION {
            return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "unsupported snapshot version {}",
                data.version
            ))
            .into());
        }

        let mut tables = IndexMap::with_capacity(data.tables.len());
        for table in data.tables {
            table.validate()?;
            let name = table.name().to_string();
            if tables.contains_key(&name) {
                return Err(Error::DuplicateTable(name));
            }
            tables.insert(name, table);
        }

        debug!(path = %path.as_ref().display(), tables = tables.len(), "store loaded");
        Ok(Self { tables })
    }
}

/// Serializable proxy for Store
#[derive(Serialize, Deserialize)]
struct StoreData<T> {
    version: u32,
    tables: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Column;
    use crate::sql::ast::CompareOp;

    fn store_with_users() -> Store {
        let mut store = Store::new();
        store
            .create_table(
                "users",
                Schema::from_columns(vec![
                    Column::new("id", ColumnType::Integer),
                    Column::new("name", ColumnType::Text),
                ]),
            )
            .unwrap();
        store
            .insert_row("users", vec![1i64.into(), "Alice".into()])
            .unwrap();
        store
            .insert_row("users", vec![2i64.into(), "Bob".into()])
            .unwrap();
        store
    }

    #[test]
    fn test_create_duplicate_table() {
        let mut store = store_with_users();
        let result = store.create_table("users", Schema::new());

        assert!(matches!(result, Err(Error::DuplicateTable(name)) if name == "users"));
        assert_eq!(store.table("users").unwrap().row_count(), 2);
    }

    #[test]
    fn test_drop_table() {
        let mut store = store_with_users();

        store.drop_table("users").unwrap();
        assert!(!store.has_table("users"));
        assert!(matches!(
            store.drop_table("users"),
            Err(Error::UnknownTable(_))
        ));
    }

    #[test]
    fn test_unknown_table() {
        let mut store = Store::new();

        assert!(matches!(store.scan("ghost", None), Err(Error::UnknownTable(_))));
        assert!(matches!(
            store.insert_row("ghost", vec![]),
            Err(Error::UnknownTable(_))
        ));
        assert!(matches!(
            store.add_column("ghost", "x", ColumnType::Text),
            Err(Error::UnknownTable(_))
        ));
    }

    #[test]
    fn test_table_names_in_creation_order() {
        let mut store = store_with_users();
        store.create_table("b", Schema::new()).unwrap();
        store.create_table("a", Schema::new()).unwrap();

        assert_eq!(store.table_names(), vec!["users", "b", "a"]);
    }

    #[test]
    fn test_scan_then_project() {
        let store = store_with_users();
        let predicate = Predicate::new("id", CompareOp::Gt, 1i64);
        let rows = store.scan("users", Some(&predicate)).unwrap();
        let set = store
            .project("users", rows, &Projection::Columns(vec!["name".to_string()]))
            .unwrap();

        assert_eq!(set.columns, vec!["name"]);
        assert_eq!(set.rows, vec![vec![Value::from("Bob")]]);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut store = store_with_users();
        let snapshot = store.snapshot();

        store
            .insert_row("users", vec![3i64.into(), "Carol".into()])
            .unwrap();
        store.drop_column("users", "name").unwrap();
        store.create_table("extra", Schema::new()).unwrap();

        assert_eq!(snapshot.table_count(), 1);
        store.restore(snapshot);

        assert_eq!(store, store_with_users());
    }

    #[test]
    fn test_describe_table() {
        let store = store_with_users();
        let info = store.describe_table("users").unwrap();

        assert!(info.contains("Table: users"));
        assert!(info.contains("  id INTEGER"));
        assert!(info.contains("  name TEXT"));
    }
}
