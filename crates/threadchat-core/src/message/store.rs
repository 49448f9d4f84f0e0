//! Message store: build, validate, and guarded save.
//!
//! Saving always goes through validation; there is no path that hands an
//! unchecked draft to the repository.

use threadchat_types::conversation::Conversation;
use threadchat_types::error::{ExchangeError, RepositoryError, ValidationError};
use threadchat_types::message::{Message, MessageDraft, Sender, ValidMessage};
use tracing::{debug, error};

use crate::message::repository::MessageRepository;

pub struct MessageStore<M: MessageRepository> {
    repo: M,
}

impl<M: MessageRepository> MessageStore<M> {
    pub fn new(repo: M) -> Self {
        Self { repo }
    }

    /// Construct an unsaved message. No side effects.
    pub fn build(
        &self,
        conversation: &Conversation,
        content: impl Into<String>,
        sender: Sender,
    ) -> MessageDraft {
        MessageDraft {
            conversation_id: conversation.id.clone(),
            content: content.into(),
            sender: sender.to_string(),
            response: None,
        }
    }

    /// Check a draft without persisting it.
    pub fn validate(&self, draft: MessageDraft) -> Result<ValidMessage, ValidationError> {
        ValidMessage::check(draft)
    }

    /// Validate, then persist. Invalid drafts never reach the repository.
    pub async fn save(&self, draft: MessageDraft) -> Result<Message, ExchangeError> {
        let conversation_id = draft.conversation_id.clone();
        let valid = self.validate(draft)?;
        let sender = valid.sender();

        let message = self.repo.insert(valid).await.map_err(|e| {
            error!(
                conversation_id = %conversation_id,
                sender = %sender,
                error = %e,
                "Message save failed"
            );
            ExchangeError::PersistFailed(e)
        })?;

        debug!(
            conversation_id = %conversation_id,
            message_id = %message.id,
            sender = %sender,
            "Message saved"
        );
        Ok(message)
    }

    /// Persist the bot side of an exchange.
    ///
    /// Bot replies are produced internally; a reply that still fails the
    /// content check is reported as a constraint violation, not as rejected
    /// user input.
    pub async fn create_bot_reply(
        &self,
        conversation: &Conversation,
        content: impl Into<String>,
        response: Option<String>,
    ) -> Result<Message, RepositoryError> {
        let mut draft = self.build(conversation, content, Sender::Bot);
        draft.response = response;

        let valid = self.validate(draft).map_err(|e| {
            error!(conversation_id = %conversation.id, error = %e, "Bot reply failed validation");
            RepositoryError::Conflict(format!("invalid bot reply: {e}"))
        })?;

        let message = self.repo.insert(valid).await.inspect_err(|e| {
            error!(
                conversation_id = %conversation.id,
                sender = %Sender::Bot,
                error = %e,
                "Bot reply save failed"
            );
        })?;

        debug!(conversation_id = %conversation.id, message_id = %message.id, "Bot reply saved");
        Ok(message)
    }
}
