//! MessageRepository trait definition.

use threadchat_types::error::RepositoryError;
use threadchat_types::message::{Message, ValidMessage};

/// Repository trait for message persistence.
///
/// Implementations live in threadchat-infra (e.g., `SqliteMessageRepository`).
pub trait MessageRepository: Send + Sync {
    /// Persist a validated message.
    ///
    /// The implementation assigns `id` and `created_at`. Within one
    /// conversation, `created_at` must strictly increase in insert order.
    fn insert(
        &self,
        message: ValidMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;
}
