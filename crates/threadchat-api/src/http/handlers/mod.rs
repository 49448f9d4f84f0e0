//! HTTP request handlers.
//!
//! `conversation` serves the HTML page and form posts, `api` the JSON
//! mirror under `/api/v1`, `health` the liveness check.

pub mod api;
pub mod conversation;
pub mod health;

use threadchat_types::conversation::ConversationId;

use crate::http::error::AppError;

/// Parse a conversation id from a path segment. Malformed ids are treated
/// as unknown.
pub(crate) fn parse_id(raw: &str) -> Result<ConversationId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Conversation '{raw}' not found")))
}
