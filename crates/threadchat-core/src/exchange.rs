//! One user-submission -> backend-call -> bot-reply cycle.
//!
//! Order of effects for a valid submission:
//! 1. resolve (find-or-create) the conversation
//! 2. persist the user message
//! 3. call the chat backend with the user message and the thread token
//! 4. persist the reply as a bot message
//!
//! Blank content stops before step 1 and touches nothing. A persistence
//! failure at any step stops the exchange; later steps never run. The
//! backend call at step 3 cannot fail, so a reachable store always ends up
//! with a user message followed by a bot message.

use std::time::Instant;

use threadchat_types::conversation::{Conversation, ConversationId};
use threadchat_types::error::{ExchangeError, ValidationError};
use threadchat_types::message::{Message, Sender};
use tracing::{info, warn};

use crate::backend::ChatBackend;
use crate::conversation::repository::ConversationRepository;
use crate::conversation::store::ConversationStore;
use crate::message::repository::MessageRepository;
use crate::message::store::MessageStore;

/// Result of a completed exchange, handed to the rendering layer.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub conversation: Conversation,
    pub user_message: Message,
    pub bot_message: Message,
}

/// Orchestrates a single exchange.
///
/// The resolved conversation is passed explicitly between steps; nothing
/// is stored on the handler per request, so one instance serves all
/// requests concurrently.
pub struct ConversationExchangeHandler<C, M, B>
where
    C: ConversationRepository,
    M: MessageRepository,
    B: ChatBackend,
{
    conversations: ConversationStore<C>,
    messages: MessageStore<M>,
    backend: B,
}

impl<C, M, B> ConversationExchangeHandler<C, M, B>
where
    C: ConversationRepository,
    M: MessageRepository,
    B: ChatBackend,
{
    pub fn new(conversations: ConversationStore<C>, messages: MessageStore<M>, backend: B) -> Self {
        Self {
            conversations,
            messages,
            backend,
        }
    }

    pub fn conversations(&self) -> &ConversationStore<C> {
        &self.conversations
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one exchange for `content` submitted to conversation `id`.
    pub async fn submit(
        &self,
        id: &ConversationId,
        content: &str,
    ) -> Result<Exchange, ExchangeError> {
        let start = Instant::now();

        if content.trim().is_empty() {
            warn!(conversation_id = %id, "Rejected blank message");
            return Err(ValidationError::new("content", "can't be blank").into());
        }

        let conversation = self.conversations.find_or_create(id).await?;

        let draft = self.messages.build(&conversation, content, Sender::User);
        let user_message = self.messages.save(draft).await?;

        let reply = self
            .backend
            .send(&user_message.content, &conversation.thread_id)
            .await;

        let bot_message = self
            .messages
            .create_bot_reply(&conversation, reply.clone(), Some(reply))
            .await?;

        info!(
            conversation_id = %conversation.id,
            thread_id = %conversation.thread_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Exchange completed"
        );

        Ok(Exchange {
            conversation,
            user_message,
            bot_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FALLBACK_REPLY;
    use crate::testing::{InMemoryStore, ScriptedBackend};

    type Handler = ConversationExchangeHandler<InMemoryStore, InMemoryStore, ScriptedBackend>;

    fn handler(backend: ScriptedBackend) -> (InMemoryStore, Handler) {
        let repo = InMemoryStore::new();
        let handler = ConversationExchangeHandler::new(
            ConversationStore::new(repo.clone()),
            MessageStore::new(repo.clone()),
            backend,
        );
        (repo, handler)
    }

    fn id(raw: &str) -> ConversationId {
        raw.parse().unwrap()
    }

    #[tokio::test]
    async fn test_hello_persists_user_then_bot() {
        let (repo, handler) = handler(ScriptedBackend::replying("Hi there!"));

        let exchange = handler.submit(&id("fresh"), "Hello").await.unwrap();

        assert_eq!(exchange.user_message.sender, Sender::User);
        assert_eq!(exchange.user_message.content, "Hello");
        assert_eq!(exchange.bot_message.sender, Sender::Bot);
        assert_eq!(exchange.bot_message.content, "Hi there!");
        assert_eq!(exchange.bot_message.response.as_deref(), Some("Hi there!"));
        assert!(exchange.bot_message.created_at >= exchange.user_message.created_at);

        let stored = handler
            .conversations()
            .get_messages(&exchange.conversation)
            .await
            .unwrap();
        assert_eq!(stored, vec![exchange.user_message, exchange.bot_message]);
        assert_eq!(repo.conversation_count(), 1);
    }

    #[tokio::test]
    async fn test_backend_receives_content_and_thread_token() {
        let backend = ScriptedBackend::replying("ok");
        let (_repo, handler) = handler(backend.clone());

        let exchange = handler.submit(&id("c"), "What's up?").await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "What's up?");
        assert_eq!(calls[0].1, exchange.conversation.thread_id);
    }

    #[tokio::test]
    async fn test_whitespace_is_rejected_without_side_effects() {
        let backend = ScriptedBackend::replying("never");
        let (repo, handler) = handler(backend.clone());

        for content in ["", "   ", "\n\t"] {
            let err = handler.submit(&id("blank"), content).await.unwrap_err();
            assert!(matches!(err, ExchangeError::Rejected(_)));
        }

        assert_eq!(repo.message_count(), 0);
        assert_eq!(repo.conversation_count(), 0);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_still_persists_fallback_reply() {
        let (repo, handler) = handler(ScriptedBackend::failing());

        let exchange = handler.submit(&id("down"), "Hello").await.unwrap();

        assert_eq!(exchange.bot_message.content, FALLBACK_REPLY);
        assert_eq!(exchange.bot_message.response.as_deref(), Some(FALLBACK_REPLY));
        assert_eq!(repo.message_count(), 2);
    }

    #[tokio::test]
    async fn test_user_message_persist_failure_skips_backend() {
        let backend = ScriptedBackend::replying("never");
        let (repo, handler) = handler(backend.clone());
        repo.fail_inserts(true);

        let err = handler.submit(&id("broken"), "Hello").await.unwrap_err();

        assert!(matches!(err, ExchangeError::PersistFailed(_)));
        assert!(backend.calls().is_empty());
        assert_eq!(repo.message_count(), 0);
    }

    #[tokio::test]
    async fn test_bot_persist_failure_keeps_user_message() {
        let (repo, handler) = handler(ScriptedBackend::replying("hi"));
        repo.fail_inserts_after(1);

        let err = handler.submit(&id("half"), "Hello").await.unwrap_err();

        assert!(matches!(err, ExchangeError::PersistFailed(_)));
        assert_eq!(repo.message_count(), 1);
    }

    #[tokio::test]
    async fn test_conversation_lookup_failure_is_persist_failure() {
        let backend = ScriptedBackend::replying("never");
        let (repo, handler) = handler(backend.clone());
        repo.fail_conversations(true);

        let err = handler.submit(&id("c"), "Hello").await.unwrap_err();

        assert!(matches!(err, ExchangeError::PersistFailed(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_exchanges_alternate_senders() {
        let (_repo, handler) = handler(ScriptedBackend::replying("pong"));
        let conversation_id = id("chatty");

        for i in 0..5 {
            handler
                .submit(&conversation_id, &format!("ping {i}"))
                .await
                .unwrap();
        }

        let conversation = handler
            .conversations()
            .get(&conversation_id)
            .await
            .unwrap()
            .unwrap();
        let messages = handler.conversations().get_messages(&conversation).await.unwrap();
        assert_eq!(messages.len(), 10);
        for (i, message) in messages.iter().enumerate() {
            let expected = if i % 2 == 0 { Sender::User } else { Sender::Bot };
            assert_eq!(message.sender, expected, "message {i}");
        }
        assert!(messages.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }

    #[tokio::test]
    async fn test_thread_token_is_stable_across_exchanges() {
        let backend = ScriptedBackend::replying("ok");
        let (_repo, handler) = handler(backend.clone());

        handler.submit(&id("same"), "one").await.unwrap();
        handler.submit(&id("same"), "two").await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls[0].1, calls[1].1);
    }
}
