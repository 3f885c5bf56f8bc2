//! Ledger engine error types

use crate::db::repository::RepoError;
use shared::models::BookingStatus;
use thiserror::Error;

/// Errors produced by the booking ledger engine.
///
/// Every error is local to a single mutation attempt and rolls the
/// attempt back completely; the previous consistent state stays readable.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Field-level validation failure, never partially applied
    #[error("validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    /// Aggregation attempted over zero items
    #[error("booking must contain at least one item")]
    EmptyBooking,

    /// Transition requested from a terminal state
    #[error("no transition permitted from {from:?} status")]
    InvalidTransition { from: BookingStatus },

    /// Optimistic version check failed on write; caller must re-read
    /// and retry, the engine does not auto-merge
    #[error("booking was modified concurrently")]
    ConcurrentModification,

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),
}

impl LedgerError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<RepoError> for LedgerError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => LedgerError::NotFound(what),
            RepoError::Duplicate(what) => {
                LedgerError::Database(format!("duplicate record: {what}"))
            }
            RepoError::Database(msg) => LedgerError::Database(msg),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
