//! Envelope response format for the JSON API.
//!
//! Every response is wrapped in a consistent envelope:
//! ```json
//! {
//!   "data": { ... },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 5 },
//!   "errors": [],
//!   "_links": { "self": "..." }
//! }
//! ```

use std::collections::HashMap;
use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

/// Per-request bookkeeping for the envelope's `meta` block.
pub struct RequestClock {
    request_id: String,
    started: Instant,
}

impl RequestClock {
    pub fn start() -> Self {
        Self {
            request_id: Uuid::now_v7().to_string(),
            started: Instant::now(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    fn meta(&self) -> ApiMeta {
        ApiMeta {
            request_id: self.request_id.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

/// Envelope response wrapping all API data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// The main response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Request metadata.
    pub meta: ApiMeta,

    /// Error list (empty on success).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,

    /// HATEOAS-style links for discoverability.
    #[serde(rename = "_links", skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ApiMeta {
    /// Unique request identifier for tracing.
    pub request_id: String,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
    /// Response time in milliseconds.
    pub response_time_ms: u64,
}

/// Individual error detail.
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Offending field, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn success(data: T, clock: &RequestClock) -> Self {
        Self {
            data: Some(data),
            meta: clock.meta(),
            errors: Vec::new(),
            links: HashMap::new(),
        }
    }

    /// Add a HATEOAS link.
    pub fn with_link(mut self, rel: &str, href: &str) -> Self {
        self.links.insert(rel.to_string(), href.to_string());
        self
    }
}

impl ApiResponse<()> {
    /// Create an error response (no data).
    pub fn error(code: &str, message: &str, field: Option<&str>, clock: &RequestClock) -> Self {
        Self {
            data: None,
            meta: clock.meta(),
            errors: vec![ApiErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
                field: field.map(str::to_string),
            }],
            links: HashMap::new(),
        }
    }
}

/// HTTP status for an envelope error code.
pub fn status_for_code(code: &str) -> StatusCode {
    match code {
        "CONVERSATION_NOT_FOUND" => StatusCode::NOT_FOUND,
        "VALIDATION_ERROR" | "PERSISTENCE_ERROR" => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = match self.errors.first() {
            None => StatusCode::OK,
            Some(error) => status_for_code(&error.code),
        };

        let body = serde_json::to_string(&self).unwrap_or_else(|_| {
            r#"{"errors":[{"code":"SERIALIZATION_ERROR","message":"Failed to serialize response"}]}"#.to_string()
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
