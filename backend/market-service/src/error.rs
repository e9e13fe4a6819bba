use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{ContentId, SessionId, UserId};

pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors surfaced by the marketplace core.
///
/// All variants are recoverable at the caller's HTTP layer (404/400-class);
/// none are fatal and the core never retries on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    #[error("content {0} not found")]
    ContentNotFound(ContentId),

    #[error("content {0} is not active")]
    ContentInactive(ContentId),

    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("session {0} is already closed")]
    SessionAlreadyClosed(SessionId),

    #[error("invalid time range: now {now} is before session start {start}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("wallet for user {0} not found")]
    WalletNotFound(UserId),

    #[error("username {0:?} is already taken")]
    DuplicateUsername(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
