//! Statement Executor for snapdb
//!
//! This module dispatches parsed commands to the store and the transaction
//! manager and returns results.

use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::catalog::Schema;
use crate::error::{Error, Result};
use crate::sql::{self, AlterOperation, ColumnDef, Command};
use crate::storage::{Row, SchemaChange, Store};
use crate::transaction::{TransactionManager, TransactionState};

/// Query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryResult {
    /// Rows returned by SELECT
    RowSet {
        /// Column names
        columns: Vec<String>,
        /// Result rows
        rows: Vec<Row>,
    },
    /// Number of rows affected by INSERT/UPDATE/DELETE
    RowCount { count: usize },
    /// DDL and transaction control
    Acknowledged {
        message: String,
        /// Set when the statement completed as a no-op
        warning: Option<String>,
    },
}

impl QueryResult {
    /// Create a result with a message
    pub fn with_message(message: impl Into<String>) -> Self {
        QueryResult::Acknowledged {
            message: message.into(),
            warning: None,
        }
    }

    /// Create a result with affected rows count
    pub fn with_affected_rows(count: usize) -> Self {
        QueryResult::RowCount { count }
    }

    /// Warning carried by a soft failure
    pub fn warning(&self) -> Option<&str> {
        match self {
            QueryResult::Acknowledged { warning, .. } => warning.as_deref(),
            _ => None,
        }
    }

    /// Render as text, joining fields with `delimiter`
    pub fn render(&self, delimiter: &str) -> String {
        match self {
            QueryResult::RowSet { columns, rows } => {
                let mut lines = Vec::with_capacity(rows.len() + 1);
                lines.push(columns.join(delimiter));
                for row in rows {
                    let fields: Vec<String> = row.iter().map(ToString::to_string).collect();
                    lines.push(fields.join(delimiter));
                }
                lines.join("\n")
            }
            QueryResult::RowCount { count } => format!("{} row(s) affected", count),
            QueryResult::Acknowledged { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render("\t"))
    }
}

/// Execution Engine
#[derive(Debug, Default)]
pub struct ExecutionEngine {
    /// Table storage
    store: Store,
    /// Transaction Manager
    transactions: TransactionManager,
}

impl ExecutionEngine {
    /// Create an engine over an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn in_transaction(&self) -> bool {
        self.transactions.is_open()
    }

    pub fn transaction_state(&self) -> TransactionState {
        self.transactions.state()
    }

    /// Parse and execute one statement
    pub fn execute_sql(&mut self, sql: &str) -> Result<QueryResult> {
        let command = sql::parse(sql)?;
        self.execute(command)
    }

    /// Execute a parsed command
    pub fn execute(&mut self, command: Command) -> Result<QueryResult> {
        debug!(statement = command.name(), "executing");

        match command {
            Command::CreateTable { name, columns } => self.execute_create_table(&name, columns),
            Command::DropTable { name } => {
                self.store.drop_table(&name)?;
                info!(table = %name, "table dropped");
                Ok(QueryResult::with_message(format!("Table '{}' dropped", name)))
            }
            Command::Insert {
                table,
                columns,
                values,
            } => {
                self.store.insert(&table, columns.as_deref(), values)?;
                Ok(QueryResult::with_affected_rows(1))
            }
            Command::Select {
                table,
                projection,
                predicate,
            } => {
                let rows = self.store.scan(&table, predicate.as_ref())?;
                let set = self.store.project(&table, rows, &projection)?;
                Ok(QueryResult::RowSet {
                    columns: set.columns,
                    rows: set.rows,
                })
            }
            Command::Update {
                table,
                assignments,
                predicate,
            } => {
                let count = self
                    .store
                    .update_rows(&table, &assignments, predicate.as_ref())?;
                Ok(QueryResult::with_affected_rows(count))
            }
            Command::Delete { table, predicate } => {
                let count = self.store.delete_rows(&table, predicate.as_ref())?;
                Ok(QueryResult::with_affected_rows(count))
            }
            Command::Alter { table, operation } => self.execute_alter(&table, operation),
            Command::Begin => {
                self.transactions.begin(&self.store)?;
                Ok(QueryResult::with_message("Transaction started"))
            }
            Command::Commit => {
                self.transactions.commit()?;
                Ok(QueryResult::with_message("Transaction committed"))
            }
            Command::Rollback => {
                self.transactions.rollback(&mut self.store)?;
                Ok(QueryResult::with_message("Transaction rolled back"))
            }
        }
    }

    fn execute_create_table(&mut self, name: &str, columns: Vec<ColumnDef>) -> Result<QueryResult> {
        let mut schema = Schema::new();
        for column in columns {
            if !schema.add_column(column.name.clone(), column.column_type) {
                return Err(Error::syntax(
                    "CREATE TABLE",
                    format!("duplicate column '{}'", column.name),
                ));
            }
        }

        self.store.create_table(name, schema)?;
        info!(table = %name, "table created");
        Ok(QueryResult::with_message(format!("Table '{}' created", name)))
    }

    fn execute_alter(&mut self, table: &str, operation: AlterOperation) -> Result<QueryResult> {
        let change = match operation {
            AlterOperation::AddColumn { name, column_type } => {
                self.store.add_column(table, &name, column_type)?
            }
            AlterOperation::DropColumn { name } => self.store.drop_column(table, &name)?,
            AlterOperation::ModifyColumn { name, column_type } => {
                self.store.modify_column(table, &name, column_type)?
            }
        };

        match change {
            SchemaChange::Applied => {
                info!(table, "table altered");
                Ok(QueryResult::with_message(format!("Table '{}' altered", table)))
            }
            SchemaChange::Unchanged(warning) => Ok(QueryResult::Acknowledged {
                message: format!("Table '{}' unchanged", table),
                warning: Some(warning),
            }),
        }
    }

    // ========== Persistence ==========

    /// Save the store to disk; refused while a transaction is open
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.in_transaction() {
            return Err(Error::RefusedInTransaction("save"));
        }
        self.store.save_to_disk(path)
    }

    /// Replace the store with one loaded from disk; refused while a
    /// transaction is open
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if self.in_transaction() {
            return Err(Error::RefusedInTransaction("load"));
        }
        self.store = Store::load_from_disk(path)?;
        Ok(())
    }
}
