//! JSON mirror of the conversation routes.
//!
//! Endpoints:
//! - GET  /api/v1/conversations/{id}           - Conversation and ordered messages
//! - POST /api/v1/conversations/{id}/messages  - Run one exchange

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use threadchat_types::conversation::Conversation;
use threadchat_types::message::Message;

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::http::handlers::parse_id;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Request body for submitting a message.
///
/// A missing or `null` content is treated as blank.
#[derive(Debug, Deserialize)]
pub struct NewMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationBody {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ExchangeBody {
    pub user_message: Message,
    pub bot_message: Message,
}

fn links_for(id: &str) -> (String, String) {
    (
        format!("/api/v1/conversations/{id}"),
        format!("/api/v1/conversations/{id}/messages"),
    )
}

/// Success and failure both report against the clock started by the handler.
fn respond<T: Serialize>(
    clock: &RequestClock,
    result: Result<ApiResponse<T>, AppError>,
) -> Response {
    match result {
        Ok(resp) => resp.into_response(),
        Err(e) => e.into_envelope(clock),
    }
}

/// GET /api/v1/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let clock = RequestClock::start();
    let result = load_conversation(&state, &raw_id, &clock).await;
    respond(&clock, result)
}

async fn load_conversation(
    state: &AppState,
    raw_id: &str,
    clock: &RequestClock,
) -> Result<ApiResponse<ConversationBody>, AppError> {
    let id = parse_id(raw_id)?;
    let view = state.exchange.conversations().open(&id).await?;
    let (self_link, messages_link) = links_for(id.as_str());

    Ok(ApiResponse::success(
        ConversationBody {
            conversation: view.conversation,
            messages: view.messages,
        },
        clock,
    )
    .with_link("self", &self_link)
    .with_link("messages", &messages_link)
    .with_link("html", &format!("/conversations/{id}")))
}

/// POST /api/v1/conversations/{id}/messages
pub async fn post_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<NewMessageRequest>,
) -> Response {
    let clock = RequestClock::start();
    let content = body.content.unwrap_or_default();
    let result = run_exchange(&state, &raw_id, &content, &clock).await;
    respond(&clock, result)
}

async fn run_exchange(
    state: &AppState,
    raw_id: &str,
    content: &str,
    clock: &RequestClock,
) -> Result<ApiResponse<ExchangeBody>, AppError> {
    let id = parse_id(raw_id)?;
    let exchange = state.exchange.submit(&id, content).await?;
    let (self_link, messages_link) = links_for(id.as_str());

    Ok(ApiResponse::success(
        ExchangeBody {
            user_message: exchange.user_message,
            bot_message: exchange.bot_message,
        },
        clock,
    )
    .with_link("self", &messages_link)
    .with_link("conversation", &self_link))
}
