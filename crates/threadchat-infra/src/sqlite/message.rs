//! SQLite message repository implementation.

use chrono::{Duration, SubsecRound, Utc};
use sqlx::Row;
use threadchat_core::message::repository::MessageRepository;
use threadchat_types::conversation::ConversationId;
use threadchat_types::error::RepositoryError;
use threadchat_types::message::{Message, Sender, ValidMessage};
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
pub(crate) struct MessageRow {
    id: String,
    conversation_id: String,
    content: String,
    sender: String,
    response: Option<String>,
    created_at: String,
}

impl MessageRow {
    pub(crate) fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            content: row.try_get("content")?,
            sender: row.try_get("sender")?,
            response: row.try_get("response")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub(crate) fn into_message(self) -> Result<Message, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let conversation_id: ConversationId = self
            .conversation_id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid conversation_id: {e}")))?;
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid sender: {e}")))?;

        Ok(Message {
            id,
            conversation_id,
            content: self.content,
            sender,
            response: self.response,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn insert(&self, message: ValidMessage) -> Result<Message, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let latest: Option<String> = sqlx::query_scalar(
            "SELECT MAX(created_at) FROM messages WHERE conversation_id = ?",
        )
        .bind(message.conversation_id().as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;

        // Strictly after the newest message even if the clock stalls or steps back.
        let now = Utc::now().trunc_subsecs(6);
        let created_at = match latest.as_deref().map(parse_datetime).transpose()? {
            Some(latest) if now <= latest => latest + Duration::microseconds(1),
            _ => now,
        };
        let id = Uuid::now_v7();

        sqlx::query(
            r#"INSERT INTO messages (id, conversation_id, content, sender, response, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(message.conversation_id().as_str())
        .bind(message.content())
        .bind(message.sender().to_string())
        .bind(message.response())
        .bind(format_datetime(&created_at))
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;

        Ok(message.into_message(id, created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::conversation::SqliteConversationRepository;
    use crate::sqlite::pool::test_pool;
    use threadchat_core::conversation::store::ConversationStore;
    use threadchat_core::message::store::MessageStore;
    use threadchat_types::conversation::Conversation;
    use threadchat_types::error::ExchangeError;

    async fn setup() -> (
        DatabasePool,
        ConversationStore<SqliteConversationRepository>,
        MessageStore<SqliteMessageRepository>,
        Conversation,
    ) {
        let pool = test_pool().await;
        let conversations =
            ConversationStore::new(SqliteConversationRepository::new(pool.clone()));
        let messages = MessageStore::new(SqliteMessageRepository::new(pool.clone()));
        let conversation = conversations
            .find_or_create(&"conv".parse().unwrap())
            .await
            .unwrap();
        (pool, conversations, messages, conversation)
    }

    #[tokio::test]
    async fn test_saved_message_matches_stored_row() {
        let (_pool, conversations, messages, conversation) = setup().await;

        let saved = messages
            .save(messages.build(&conversation, "Hello", Sender::User))
            .await
            .unwrap();

        let listed = conversations.get_messages(&conversation).await.unwrap();
        assert_eq!(listed, vec![saved]);
        assert!(listed[0].response.is_none());
    }

    #[tokio::test]
    async fn test_bot_reply_keeps_response() {
        let (_pool, conversations, messages, conversation) = setup().await;

        messages
            .create_bot_reply(&conversation, "Hi there", Some("Hi there".to_string()))
            .await
            .unwrap();

        let listed = conversations.get_messages(&conversation).await.unwrap();
        assert_eq!(listed[0].sender, Sender::Bot);
        assert_eq!(listed[0].response.as_deref(), Some("Hi there"));
    }

    #[tokio::test]
    async fn test_created_at_strictly_increases() {
        let (_pool, conversations, messages, conversation) = setup().await;

        for i in 0..50 {
            messages
                .save(messages.build(&conversation, format!("m{i}"), Sender::User))
                .await
                .unwrap();
        }

        let listed = conversations.get_messages(&conversation).await.unwrap();
        assert_eq!(listed.len(), 50);
        assert!(listed.windows(2).all(|w| w[0].created_at < w[1].created_at));
        for (i, message) in listed.iter().enumerate() {
            assert_eq!(message.content, format!("m{i}"));
        }
    }

    #[tokio::test]
    async fn test_created_at_steps_past_future_timestamp() {
        let (pool, _conversations, messages, conversation) = setup().await;

        let future = "2999-01-01T00:00:00.000000Z";
        sqlx::query(
            "INSERT INTO messages (id, conversation_id, content, sender, response, created_at) VALUES (?, ?, 'ahead', 'user', NULL, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(conversation.id.as_str())
        .bind(future)
        .execute(&pool.writer)
        .await
        .unwrap();

        let saved = messages
            .save(messages.build(&conversation, "after", Sender::User))
            .await
            .unwrap();
        assert_eq!(format_datetime(&saved.created_at), "2999-01-01T00:00:00.000001Z");
    }

    #[tokio::test]
    async fn test_concurrent_saves_keep_distinct_timestamps() {
        let (_pool, conversations, messages, conversation) = setup().await;
        let messages = std::sync::Arc::new(messages);

        let mut handles = Vec::new();
        for i in 0..20 {
            let messages = std::sync::Arc::clone(&messages);
            let conversation = conversation.clone();
            handles.push(tokio::spawn(async move {
                messages
                    .save(messages.build(&conversation, format!("c{i}"), Sender::User))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let listed = conversations.get_messages(&conversation).await.unwrap();
        assert_eq!(listed.len(), 20);
        assert!(listed.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }

    #[tokio::test]
    async fn test_insert_for_unknown_conversation_fails() {
        let pool = test_pool().await;
        let messages = MessageStore::new(SqliteMessageRepository::new(pool));
        let orphan = Conversation {
            id: "missing".parse().unwrap(),
            thread_id: "t".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let err = messages
            .save(messages.build(&orphan, "Hello", Sender::User))
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::PersistFailed(_)));
    }

    #[tokio::test]
    async fn test_schema_rejects_unknown_sender() {
        let (pool, _conversations, _messages, conversation) = setup().await;

        let result = sqlx::query(
            "INSERT INTO messages (id, conversation_id, content, sender, response, created_at) VALUES (?, ?, 'x', 'admin', NULL, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(conversation.id.as_str())
        .bind(format_datetime(&Utc::now()))
        .execute(&pool.writer)
        .await;
        assert!(result.is_err());
    }
}
