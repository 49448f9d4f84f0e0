//! Wire types for the chat backend's JSON API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub thread_id: &'a str,
}

/// Response body for `POST /api/chat`.
///
/// Only `response` is required; anything else the backend sends (it echoes
/// `thread_id`) is ignored.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub response: String,
}
