//! HTML handlers for the conversation page.
//!
//! Endpoints:
//! - GET  /                              - Start a conversation, redirect to it
//! - GET  /conversations/{id}            - Full page (find-or-create)
//! - POST /conversations/{id}/messages   - Submit a message

use axum::Form;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::http::error::AppError;
use crate::http::handlers::parse_id;
use crate::state::AppState;

/// Compose form body.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub content: String,
}

/// HTML routes answer failures with the bare status code.
fn html_error(err: AppError) -> Response {
    err.log();
    err.status().into_response()
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn page_path(id: &str) -> String {
    format!("/conversations/{id}")
}

/// GET / - Create a fresh conversation and send the visitor there.
pub async fn start(State(state): State<AppState>) -> Response {
    match state.exchange.conversations().start().await {
        Ok(conversation) => Redirect::to(&page_path(conversation.id.as_str())).into_response(),
        Err(e) => html_error(e.into()),
    }
}

/// GET /conversations/{id} - Render the conversation with all its messages.
pub async fn show(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let result = async {
        let id = parse_id(&raw_id)?;
        let view = state.exchange.conversations().open(&id).await?;
        Ok::<_, AppError>(state.templates.conversation_page(&view)?)
    }
    .await;

    match result {
        Ok(html) => Html(html).into_response(),
        Err(e) => html_error(e),
    }
}

/// POST /conversations/{id}/messages - Run one exchange.
///
/// htmx requests get the two new messages as a fragment to append; plain
/// form posts are redirected back to the page.
pub async fn post_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<MessageForm>,
) -> Response {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return html_error(e),
    };

    let exchange = match state.exchange.submit(&id, &form.content).await {
        Ok(exchange) => exchange,
        // Any rejection or storage failure is a 422 with no body.
        Err(e) => {
            let err = AppError::from(e);
            err.log();
            return StatusCode::UNPROCESSABLE_ENTITY.into_response();
        }
    };

    if !is_htmx(&headers) {
        return Redirect::to(&page_path(id.as_str())).into_response();
    }

    match state.templates.exchange_fragment(&exchange) {
        Ok(html) => Html(html).into_response(),
        Err(e) => html_error(e.into()),
    }
}
