//! Application error type mapping to HTTP status codes and envelope format.
//!
//! JSON handlers render the full envelope against their own request clock
//! (see [`AppError::into_envelope`]); HTML routes answer with the bare status
//! (see [`AppError::status`]).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use threadchat_types::error::{ExchangeError, RepositoryError, ValidationError};

use crate::http::response::{ApiResponse, RequestClock, status_for_code};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Input failed validation; nothing was persisted.
    Rejected(ValidationError),
    /// The store failed while serving the request.
    Persistence(RepositoryError),
    /// Unknown or malformed conversation id.
    NotFound(String),
    /// Template rendering failed.
    Render(String),
}

impl From<ExchangeError> for AppError {
    fn from(e: ExchangeError) -> Self {
        match e {
            ExchangeError::Rejected(v) => AppError::Rejected(v),
            ExchangeError::PersistFailed(r) => AppError::Persistence(r),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => AppError::NotFound("Conversation not found".to_string()),
            other => AppError::Persistence(other),
        }
    }
}

impl From<minijinja::Error> for AppError {
    fn from(e: minijinja::Error) -> Self {
        AppError::Render(e.to_string())
    }
}

impl AppError {
    fn parts(&self) -> (&'static str, String, Option<&'static str>) {
        match self {
            AppError::Rejected(v) => ("VALIDATION_ERROR", v.to_string(), Some(v.field)),
            // Storage details stay in the logs.
            AppError::Persistence(_) => (
                "PERSISTENCE_ERROR",
                "Message could not be processed".to_string(),
                None,
            ),
            AppError::NotFound(msg) => ("CONVERSATION_NOT_FOUND", msg.clone(), None),
            AppError::Render(_) => ("RENDER_ERROR", "Page could not be rendered".to_string(), None),
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for_code(self.parts().0)
    }

    pub fn log(&self) {
        match self {
            AppError::Rejected(v) => tracing::warn!(error = %v, "Request rejected"),
            AppError::Persistence(e) => tracing::error!(error = %e, "Request failed in storage"),
            AppError::NotFound(msg) => tracing::debug!(%msg, "Not found"),
            AppError::Render(e) => tracing::error!(error = %e, "Template rendering failed"),
        }
    }

    /// Render the error envelope with `meta` taken from the handler's clock.
    pub fn into_envelope(self, clock: &RequestClock) -> Response {
        self.log();
        let (code, message, field) = self.parts();
        tracing::debug!(request_id = %clock.request_id(), %code, "Error envelope");
        ApiResponse::error(code, &message, field, clock).into_response()
    }
}

/// Used for rejections raised by extractors, before any handler has started
/// its clock.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_envelope(&RequestClock::start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_and_persistence_are_unprocessable() {
        let rejected: AppError =
            ExchangeError::Rejected(ValidationError::new("content", "can't be blank")).into();
        let persistence: AppError =
            ExchangeError::PersistFailed(RepositoryError::Connection).into();

        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(persistence.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_render_error_is_500() {
        let err = AppError::Render("boom".to_string());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_envelope_meta_uses_handler_clock() {
        let clock = RequestClock::start();
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;

        let err: AppError = RepositoryError::Connection.into();
        let resp = err.into_envelope(&clock);
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["meta"]["request_id"], clock.request_id());
        assert!(body["meta"]["response_time_ms"].as_u64().unwrap() >= 30);
        assert_eq!(body["errors"][0]["code"], "PERSISTENCE_ERROR");
    }
}
