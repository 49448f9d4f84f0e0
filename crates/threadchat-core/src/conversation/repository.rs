//! ConversationRepository trait definition.
//!
//! Follows the RPITIT pattern used by every repository port in this crate.

use threadchat_types::conversation::{Conversation, ConversationId, NewConversation};
use threadchat_types::error::RepositoryError;
use threadchat_types::message::Message;

/// Repository trait for conversation persistence.
///
/// Implementations live in threadchat-infra (e.g., `SqliteConversationRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationRepository: Send + Sync {
    /// Insert the conversation unless one with the same id exists, then
    /// return the stored row.
    ///
    /// Must be atomic: concurrent calls for the same id all observe the same
    /// winning row (and therefore the same `thread_id`).
    fn find_or_insert(
        &self,
        conversation: &NewConversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by its external id.
    fn get(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Delete a conversation and all of its messages.
    fn delete(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All messages of a conversation, ordered by created_at ASC.
    fn list_messages(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}
