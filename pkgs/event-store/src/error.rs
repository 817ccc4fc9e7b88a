//! Error types for event store operations

use thiserror::Error;

/// A type alias for `Result<T, StoreError>`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the event store.
///
/// Expected absence (unknown id, soft-deleted row, empty filter) is never an
/// error: lookups return `Ok(None)` or an empty list instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller's input mapping is missing a required field or has the
    /// wrong shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// A row written by this instance could not be read back
    #[error("Event {0} no longer exists in the store")]
    StaleReference(i32),

    /// Connection or driver level failure, never retried
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
