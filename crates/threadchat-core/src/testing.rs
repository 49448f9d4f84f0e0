//! In-memory fakes of the core ports, shared by unit tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use threadchat_types::conversation::{Conversation, ConversationId, NewConversation};
use threadchat_types::error::{BackendError, RepositoryError};
use threadchat_types::message::{Message, MessageDraft, Sender, ValidMessage};
use uuid::Uuid;

use crate::backend::{ChatBackend, reply_or_fallback};
use crate::conversation::repository::ConversationRepository;
use crate::message::repository::MessageRepository;

#[derive(Default)]
struct State {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    last_created_at: Option<DateTime<Utc>>,
    /// Remaining successful inserts; `None` means unlimited.
    insert_budget: Option<usize>,
    fail_conversations: bool,
}

impl State {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }
}

/// Implements both repository traits over one shared state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_count(&self) -> usize {
        self.state.lock().unwrap().conversations.len()
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().unwrap().messages.len()
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.state.lock().unwrap().insert_budget = fail.then_some(0);
    }

    pub fn fail_inserts_after(&self, successes: usize) {
        self.state.lock().unwrap().insert_budget = Some(successes);
    }

    pub fn fail_conversations(&self, fail: bool) {
        self.state.lock().unwrap().fail_conversations = fail;
    }

    pub fn push_message(&self, conversation_id: &ConversationId, content: &str, sender: Sender) {
        let valid = ValidMessage::check(MessageDraft {
            conversation_id: conversation_id.clone(),
            content: content.to_string(),
            sender: sender.to_string(),
            response: None,
        })
        .unwrap();
        let mut state = self.state.lock().unwrap();
        let ts = state.next_timestamp();
        state.messages.push(valid.into_message(Uuid::now_v7(), ts));
    }
}

impl ConversationRepository for InMemoryStore {
    async fn find_or_insert(
        &self,
        conversation: &NewConversation,
    ) -> Result<Conversation, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_conversations {
            return Err(RepositoryError::Connection);
        }
        if let Some(existing) = state.conversations.iter().find(|c| c.id == conversation.id) {
            return Ok(existing.clone());
        }
        let created = Conversation {
            id: conversation.id.clone(),
            thread_id: conversation.thread_id.clone(),
            created_at: conversation.created_at,
            updated_at: conversation.created_at,
        };
        state.conversations.push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.conversations.iter().find(|c| &c.id == id).cloned())
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.conversations.len();
        state.conversations.retain(|c| &c.id != id);
        if state.conversations.len() == before {
            return Err(RepositoryError::NotFound);
        }
        state.messages.retain(|m| &m.conversation_id != id);
        Ok(())
    }

    async fn list_messages(&self, id: &ConversationId) -> Result<Vec<Message>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut messages: Vec<Message> = state
            .messages
            .iter()
            .filter(|m| &m.conversation_id == id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }
}

impl MessageRepository for InMemoryStore {
    async fn insert(&self, message: ValidMessage) -> Result<Message, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        match state.insert_budget {
            Some(0) => return Err(RepositoryError::Query("disk I/O error".to_string())),
            Some(n) => state.insert_budget = Some(n - 1),
            None => {}
        }
        let ts = state.next_timestamp();
        let stored = message.into_message(Uuid::now_v7(), ts);
        state.messages.push(stored.clone());
        Ok(stored)
    }
}

/// Backend that answers with a fixed reply, or fails every call.
#[derive(Clone)]
pub struct ScriptedBackend {
    reply: Option<String>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Arc::default(),
        }
    }

    /// `(message, thread_id)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChatBackend for ScriptedBackend {
    async fn send(&self, message: &str, thread_id: &str) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((message.to_string(), thread_id.to_string()));
        let outcome = self
            .reply
            .clone()
            .ok_or_else(|| BackendError::Transport("connection refused".to_string()));
        reply_or_fallback(thread_id, outcome)
    }

    async fn health(&self) -> bool {
        self.reply.is_some()
    }
}
