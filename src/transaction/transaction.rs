//! Transaction Manager
//!
//! Handles transaction lifecycle (Begin, Commit, Rollback) by snapshotting
//! the whole store at BEGIN and swapping it back on ROLLBACK.

use tracing::info;

use crate::error::{Error, Result};
use crate::storage::{Snapshot, Store};

/// Transaction State
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Open,
}

/// Transaction Manager
///
/// At most one transaction is open at a time. Mutations made while it is
/// open go straight to the live store; only ROLLBACK looks at the snapshot.
#[derive(Debug, Default)]
pub struct TransactionManager {
    /// Copy of the store taken at BEGIN
    snapshot: Option<Snapshot>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> TransactionState {
        if self.snapshot.is_some() {
            TransactionState::Open
        } else {
            TransactionState::Idle
        }
    }

    pub fn is_open(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Begin a transaction
    pub fn begin(&mut self, store: &Store) -> Result<()> {
        if self.is_open() {
            return Err(Error::TransactionAlreadyOpen);
        }
        let snapshot = store.snapshot();
        info!(tables = snapshot.table_count(), "transaction started");
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// Commit the open transaction, keeping the live store
    pub fn commit(&mut self) -> Result<()> {
        self.snapshot.take().ok_or(Error::NoTransactionOpen)?;
        info!("transaction committed");
        Ok(())
    }

    /// Roll back the open transaction, restoring the store captured at BEGIN
    pub fn rollback(&mut self, store: &mut Store) -> Result<()> {
        let snapshot = self.snapshot.take().ok_or(Error::NoTransactionOpen)?;
        store.restore(snapshot);
        info!("transaction rolled back");
        Ok(())
    }
}
