use crate::unit_of_work::RecordKind;
use thiserror::Error;

/// Failures raised by a backing store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A question with the same key already exists in the bank.
    #[error("duplicate question key: {0}")]
    DuplicateKey(String),

    /// A stored row cannot be turned back into a question.
    #[error("corrupt question row: {0}")]
    CorruptRow(String),

    /// The store refused to delete a record collection.
    #[error("store rejected purge of {kind}: {reason}")]
    Rejected { kind: RecordKind, reason: String },

    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StorageError {
    /// Returns `true` if the failure came from a constraint the store
    /// enforces (unique key, kind/shape check, foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            StorageError::DuplicateKey(_) => true,
            StorageError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}
