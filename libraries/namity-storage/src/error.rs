//! Storage error types

use thiserror::Error;

/// Errors from the state store backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to open or create the database
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Failed to begin a transaction
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Failed to open a table
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    /// Low-level storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    /// Failed to commit a transaction
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),
}

impl From<StorageError> for namity_core::CoreError {
    fn from(err: StorageError) -> Self {
        namity_core::CoreError::Storage(err.to_string())
    }
}
