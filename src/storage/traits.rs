//! Storage traits and error types

use crate::crawler::Target;
use crate::storage::ResultRecord;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable destination for crawl results
///
/// Implementations only append. Deduplication is the caller's job: the
/// store writes whatever it is handed.
pub trait ResultStore {
    /// Appends records in order and makes them durable before returning
    ///
    /// Returns the number of records written.
    fn append(&mut self, records: &[ResultRecord]) -> StoreResult<usize>;

    /// Targets that already have a complete line in the store
    fn recorded_targets(&self) -> StoreResult<BTreeSet<Target>>;
}
