//! Store-level error type (`Transient` / `Internal` kinds, as they
//! apply to the persistence boundary).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Lock contention, timeout, or other condition worth retrying.
    #[error("transient store error: {0}")]
    Transient(String),

    #[error("no record found for the given key")]
    NotFound,

    /// A write violated a uniqueness constraint (e.g. the SourceLink triple).
    #[error("conflicting write: {0}")]
    Conflict(String),

    #[error("store is not in a transaction")]
    NoActiveTransaction,
}

impl StoreError {
    /// Whether the orchestrator's retry policy should retry
    /// this error, as opposed to recording it as a permanent failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}
