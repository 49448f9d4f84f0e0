//! Port for the remote chat backend.
//!
//! The backend is an opaque service that keeps its own context per thread
//! token. From the caller's side a call never fails: transport, status and
//! decoding problems are folded into [`FALLBACK_REPLY`].

use threadchat_types::error::BackendError;
use tracing::error;

/// Reply substituted for the bot message whenever the backend call fails.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting right now.";

/// Remote chat backend.
///
/// Implementations live in threadchat-infra (e.g., `HttpChatBackend`).
pub trait ChatBackend: Send + Sync {
    /// Send one user message and return the reply text.
    ///
    /// At most one attempt is made. Always yields text, possibly
    /// [`FALLBACK_REPLY`].
    fn send(
        &self,
        message: &str,
        thread_id: &str,
    ) -> impl std::future::Future<Output = String> + Send;

    /// Whether the backend currently answers its health check.
    fn health(&self) -> impl std::future::Future<Output = bool> + Send;
}

/// Collapse a backend outcome into reply text, logging any failure.
pub fn reply_or_fallback(thread_id: &str, outcome: Result<String, BackendError>) -> String {
    match outcome {
        Ok(reply) => reply,
        Err(e) => {
            let kind = match &e {
                BackendError::Transport(_) => "transport",
                BackendError::Timeout => "timeout",
                BackendError::Status { .. } => "status",
                BackendError::Decode(_) => "decode",
            };
            error!(thread_id = %thread_id, kind, error = %e, "AI backend error");
            FALLBACK_REPLY.to_string()
        }
    }
}
