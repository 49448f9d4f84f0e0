//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `threadchat-core` using sqlx with
//! split read/write pools: raw queries, private Row structs.

use sqlx::Row;
use threadchat_core::conversation::repository::ConversationRepository;
use threadchat_types::conversation::{Conversation, ConversationId, NewConversation};
use threadchat_types::error::RepositoryError;
use threadchat_types::message::Message;

use super::message::MessageRow;
use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `ConversationRepository`.
#[derive(Clone)]
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Conversation.
struct ConversationRow {
    id: String,
    thread_id: String,
    created_at: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            thread_id: row.try_get("thread_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let id: ConversationId = self
            .id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;

        Ok(Conversation {
            id,
            thread_id: self.thread_id,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl ConversationRepository for SqliteConversationRepository {
    async fn find_or_insert(
        &self,
        conversation: &NewConversation,
    ) -> Result<Conversation, RepositoryError> {
        let created_at = format_datetime(&conversation.created_at);

        // ON CONFLICT(id) only: a thread_id collision must still fail loudly.
        sqlx::query(
            r#"INSERT INTO conversations (id, thread_id, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(id) DO NOTHING"#,
        )
        .bind(conversation.id.as_str())
        .bind(&conversation.thread_id)
        .bind(&created_at)
        .bind(&created_at)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(conversation.id.as_str())
            .fetch_one(&self.pool.writer)
            .await
            .map_err(query_error)?;

        ConversationRow::from_row(&row)
            .map_err(query_error)?
            .into_conversation()
    }

    async fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row).map_err(query_error)?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_messages(&self, id: &ConversationId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row = MessageRow::from_row(row).map_err(query_error)?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }
}
