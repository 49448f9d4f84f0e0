//! Conversation store: find-or-create by external id and ordered message reads.

use chrono::Utc;
use threadchat_types::conversation::{Conversation, ConversationId, NewConversation};
use threadchat_types::error::RepositoryError;
use threadchat_types::message::Message;
use tracing::{debug, error, info};

use crate::conversation::repository::ConversationRepository;
use crate::identity::generate_thread_id;

/// A conversation together with its messages in display order.
#[derive(Debug, Clone)]
pub struct ConversationView {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Owns conversation lifecycle: lazy creation and the 1:N message relation.
///
/// Generic over `ConversationRepository` to keep threadchat-core free of
/// infrastructure dependencies.
pub struct ConversationStore<C: ConversationRepository> {
    repo: C,
}

impl<C: ConversationRepository> ConversationStore<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &C {
        &self.repo
    }

    /// Look up a conversation, creating it on first reference.
    ///
    /// A new thread token is generated for every attempt, but only the row
    /// that wins the insert keeps one; existing conversations are returned
    /// unchanged.
    pub async fn find_or_create(
        &self,
        id: &ConversationId,
    ) -> Result<Conversation, RepositoryError> {
        let candidate = NewConversation {
            id: id.clone(),
            thread_id: generate_thread_id(),
            created_at: Utc::now(),
        };

        let conversation = self
            .repo
            .find_or_insert(&candidate)
            .await
            .inspect_err(|e| {
                error!(conversation_id = %id, error = %e, "Conversation lookup failed");
            })?;
        if conversation.thread_id == candidate.thread_id {
            info!(conversation_id = %id, thread_id = %conversation.thread_id, "Conversation created");
        } else {
            debug!(conversation_id = %id, "Conversation found");
        }
        Ok(conversation)
    }

    /// Create a conversation under a freshly generated id.
    pub async fn start(&self) -> Result<Conversation, RepositoryError> {
        self.find_or_create(&ConversationId::generate()).await
    }

    /// Look up a conversation without creating it.
    pub async fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, RepositoryError> {
        self.repo.get(id).await
    }

    /// Delete a conversation; its messages go with it.
    pub async fn delete(&self, id: &ConversationId) -> Result<(), RepositoryError> {
        self.repo.delete(id).await?;
        info!(conversation_id = %id, "Conversation deleted");
        Ok(())
    }

    /// Messages of a conversation in ascending creation order.
    ///
    /// Each call re-queries the store.
    pub async fn get_messages(
        &self,
        conversation: &Conversation,
    ) -> Result<Vec<Message>, RepositoryError> {
        self.repo.list_messages(&conversation.id).await
    }

    /// find-or-create plus message load, for rendering a conversation page.
    pub async fn open(&self, id: &ConversationId) -> Result<ConversationView, RepositoryError> {
        let conversation = self.find_or_create(id).await?;
        let messages = self.get_messages(&conversation).await?;
        Ok(ConversationView {
            conversation,
            messages,
        })
    }
}
