//! Error taxonomy for the rewards engine.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Failure modes surfaced by every rewards operation.
///
/// Validation variants (`Unauthenticated`, `NotFound`, `InvalidInput`) are always
/// raised before anything is written.
#[derive(Debug, Error)]
pub enum RewardsError {
    /// No caller identity was resolved upstream.
    #[error("caller is not authenticated")]
    Unauthenticated,

    /// The referenced achievement id is not in the catalog.
    #[error("achievement not found: {0}")]
    NotFound(String),

    /// A numeric argument is out of range or a string enum is unknown.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The persistence layer failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    /// A stored row could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The blocking task or the connection lock failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RewardsError {
    /// `true` when the same call may succeed if retried (SQLite busy or locked).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StoreUnavailable(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, RewardsError>;
