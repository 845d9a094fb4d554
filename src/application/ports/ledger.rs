//! Ledger store port interface

use thiserror::Error;

use crate::domain::ledger::{ExpenseDraft, ExpenseRecord, LedgerSummary};

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to open ledger database: {0}")]
    OpenFailed(String),

    #[error("Ledger query failed: {0}")]
    QueryFailed(String),
}

/// Port for the persistent expense ledger.
///
/// All operations are synchronous and short; implementations serialize
/// access so calls never interleave.
pub trait LedgerStore: Send + Sync {
    /// Idempotently ensure the records table exists. Safe on every
    /// startup.
    fn initialize(&self) -> Result<(), StorageError>;

    /// Insert one draft; the store assigns the id. Missing fields were
    /// already defaulted upstream and are written as-is.
    fn insert(&self, draft: &ExpenseDraft) -> Result<ExpenseRecord, StorageError>;

    /// All records in ascending id order. No pagination.
    fn list_all(&self) -> Result<Vec<ExpenseRecord>, StorageError>;

    /// Remove at most one record. An unknown id affects zero rows and
    /// is not an error; the affected count is returned so callers can
    /// report it.
    fn delete_by_id(&self, id: i64) -> Result<usize, StorageError>;

    /// Remove every record.
    fn delete_all(&self) -> Result<(), StorageError>;

    /// Grand total plus per-category totals and percentages. Percent
    /// is 0 when the grand total is 0.
    fn aggregate(&self) -> Result<LedgerSummary, StorageError>;
}
