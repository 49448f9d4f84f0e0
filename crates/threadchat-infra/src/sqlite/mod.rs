//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod conversation;
pub mod message;
pub mod pool;

use chrono::{DateTime, SecondsFormat, Utc};
use threadchat_types::error::RepositoryError;

/// Timestamps are stored as fixed-width RFC 3339 text (microseconds, `Z`),
/// so lexical order in SQL equals chronological order.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Map a sqlx error onto the repository error taxonomy.
pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        other => RepositoryError::Query(other.to_string()),
    }
}
