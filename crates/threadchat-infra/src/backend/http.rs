//! HttpChatBackend -- concrete [`ChatBackend`] over the backend's JSON API.
//!
//! Sends `POST {base_url}/api/chat` with `{"message", "thread_id"}` and reads
//! the `response` field of the JSON reply. One attempt per message, bounded by
//! the configured timeout; every failure becomes the fallback reply.

use std::time::{Duration, Instant};

use threadchat_core::backend::{ChatBackend, reply_or_fallback};
use threadchat_types::config::BackendConfig;
use threadchat_types::error::BackendError;
use tracing::{debug, warn};

use super::types::{ChatReply, ChatRequest};

/// Longest slice of an error body kept for logs.
const MAX_LOGGED_BODY: usize = 200;

/// Upper bound on a health check, independent of the chat timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpChatBackend {
    /// Create a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.effective_timeout_secs()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request_reply(&self, message: &str, thread_id: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&ChatRequest { message, thread_id })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_LOGGED_BODY).collect(),
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        let reply: ChatReply = serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::Decode(format!("failed to parse response: {e}")))?;

        // A blank reply cannot be stored as message content.
        if reply.response.trim().is_empty() {
            return Err(BackendError::Decode("empty response field".to_string()));
        }

        Ok(reply.response)
    }
}

fn transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(e.to_string())
    }
}

impl ChatBackend for HttpChatBackend {
    async fn send(&self, message: &str, thread_id: &str) -> String {
        let start = Instant::now();
        let outcome = self.request_reply(message, thread_id).await;
        debug!(
            thread_id = %thread_id,
            ok = outcome.is_ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "AI backend call finished"
        );
        reply_or_fallback(thread_id, outcome)
    }

    async fn health(&self) -> bool {
        let request = self
            .client
            .get(self.url("/api/health"))
            .timeout(HEALTH_TIMEOUT.min(self.timeout));

        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "AI backend health check failed");
                false
            }
        }
    }
}
