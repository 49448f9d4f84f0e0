//! JSON body extractor.
//!
//! Wraps axum's `Json` so that a missing content type, a syntax error or a
//! body of the wrong shape is answered with a 422 envelope instead of
//! axum's plain-text rejection.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use threadchat_types::error::ValidationError;

use crate::http::error::AppError;

/// Deserialized JSON request body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_error(rejection)),
        }
    }
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    let reason = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "must be sent as application/json".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "is not valid JSON".to_string(),
        _ => format!("is malformed: {}", rejection.body_text()),
    };
    AppError::Rejected(ValidationError::new("body", reason))
}
