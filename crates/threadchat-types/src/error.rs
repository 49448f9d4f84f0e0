use thiserror::Error;

/// A message or identifier failed validation before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors from repository operations (used by trait definitions in threadchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Failures talking to the remote chat backend.
///
/// These never leave the backend client; they are logged and replaced by
/// the fallback reply.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Why a single exchange did not complete.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Input was invalid; nothing was persisted.
    #[error("rejected: {0}")]
    Rejected(#[from] ValidationError),

    /// A message could not be stored; nothing downstream ran.
    #[error("persistence failed: {0}")]
    PersistFailed(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("content", "can't be blank");
        assert_eq!(err.to_string(), "content can't be blank");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Status {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status 503: down");
    }

    #[test]
    fn test_exchange_error_from_validation() {
        let err: ExchangeError = ValidationError::new("content", "can't be blank").into();
        assert!(matches!(err, ExchangeError::Rejected(_)));
    }
}
