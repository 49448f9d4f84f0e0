//! Conversation types for threadchat.
//!
//! A conversation is the persisted thread behind one browser session. It is
//! addressed externally by a [`ConversationId`] (the URL segment) and
//! correlated with the remote chat backend by its `thread_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Maximum length of an external conversation id.
pub const MAX_CONVERSATION_ID_LEN: usize = 64;

/// Externally visible conversation identifier.
///
/// Accepted ids are 1-64 characters of ASCII letters, digits, `-` and `_`,
/// which keeps them safe to embed in URLs and HTML attributes unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// A fresh, time-sortable id for a conversation started without one.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ConversationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::new("id", "can't be blank"));
        }
        if s.len() > MAX_CONVERSATION_ID_LEN {
            return Err(ValidationError::new(
                "id",
                format!("is too long (maximum is {MAX_CONVERSATION_ID_LEN} characters)"),
            ));
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(ValidationError::new("id", "contains invalid characters"));
        }
        Ok(Self(s.to_string()))
    }
}

/// A persisted conversation.
///
/// `thread_id` is generated exactly once, when the row is first inserted,
/// and is never regenerated. Conversations are never updated after creation,
/// so `updated_at` always equals `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate row for find-or-create.
///
/// The thread token is generated before the insert is attempted; if another
/// request wins the race the token is simply discarded.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub id: ConversationId,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
}
