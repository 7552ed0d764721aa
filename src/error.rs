// Error kinds surfaced by the task store

use thiserror::Error;

/// Rejected user input. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a task")]
    EmptyDescription,

    #[error("invalid due date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid due time: {0:?} (expected HH:MM, 24-hour)")]
    InvalidTime(String),

    #[error("invalid priority: {0:?} (expected low, medium or high)")]
    InvalidPriority(String),

    #[error("a due date is required")]
    MissingDueDate,

    #[error("a due time is required")]
    MissingDueTime,
}

/// Failure of the storage medium or of the slot encoding
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
