//! Message types for threadchat.
//!
//! Messages are ordered by `created_at` within a conversation. The exchange
//! handler produces them in user/bot pairs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::conversation::ConversationId;
use crate::error::ValidationError;

/// Who authored a message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'bot'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            _ => Err(ValidationError::new("sender", "is not included in the list")),
        }
    }
}

/// A persisted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: ConversationId,
    pub content: String,
    pub sender: Sender,
    /// Raw backend reply (bot messages only).
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An unsaved message, built for validation before commit.
///
/// `sender` stays raw text until validation so that a draft assembled from
/// untrusted input cannot skip the sender check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub conversation_id: ConversationId,
    pub content: String,
    pub sender: String,
    pub response: Option<String>,
}

/// A draft that passed validation and is ready to be inserted.
///
/// Only produced by `MessageStore::validate`; the repository assigns `id`
/// and `created_at` at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    pub(crate) conversation_id: ConversationId,
    pub(crate) content: String,
    pub(crate) sender: Sender,
    pub(crate) response: Option<String>,
}

impl ValidMessage {
    /// Check a draft and convert it into an insertable message.
    ///
    /// Fails when `content` is empty or whitespace-only, or when `sender` is
    /// anything other than `user` or `bot`.
    pub fn check(draft: MessageDraft) -> Result<Self, ValidationError> {
        if draft.content.trim().is_empty() {
            return Err(ValidationError::new("content", "can't be blank"));
        }
        let sender: Sender = draft.sender.parse()?;

        Ok(Self {
            conversation_id: draft.conversation_id,
            content: draft.content,
            sender,
            response: draft.response,
        })
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Attach the identity and timestamp chosen by the store.
    pub fn into_message(self, id: Uuid, created_at: DateTime<Utc>) -> Message {
        Message {
            id,
            conversation_id: self.conversation_id,
            content: self.content,
            sender: self.sender,
            response: self.response,
            created_at,
        }
    }
}
