//! Postgres-backed conversation store.
//!
//! Raw `sqlx::query` with explicit row mapping. Id assignment rides on the
//! messages table's BIGSERIAL; timestamps are bound at insert time so the
//! store, not the client, is authoritative. Uniqueness of ids and atomicity
//! of the bulk mark-read are delegated to Postgres.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::ConversationStore;
use crate::shared::{
    ChatError, MediaAttachment, MessageRecord, NewMessage, PopulatedMessage, UserPublic,
};

/// Conversation store over a shared Postgres pool.
#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Map a store failure onto the shared taxonomy. A foreign-key
    /// violation means the submission referenced a user that does not
    /// exist, which is the caller's fault, not the store's.
    fn map_error(err: sqlx::Error) -> ChatError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return ChatError::validation("sender/receiver", "no such user");
            }
        }
        ChatError::persistence(err.to_string())
    }

    async fn fetch_profile(&self, user_id: Uuid) -> Result<UserPublic, ChatError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, mobile
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_error)?
        .ok_or_else(|| ChatError::validation("user", "no such user"))?;

        Ok(UserPublic {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            mobile: row.get("mobile"),
        })
    }
}

/// Reassemble the optional media attachment from its flattened columns.
fn media_from_row(row: &sqlx::postgres::PgRow) -> Option<MediaAttachment> {
    let name: Option<String> = row.get("media_name");
    name.map(|name| MediaAttachment {
        name,
        content_type: row.get::<Option<String>, _>("media_type").unwrap_or_default(),
        size: row.get::<Option<i64>, _>("media_size").unwrap_or_default(),
        data: row.get::<Option<Vec<u8>>, _>("media_data").unwrap_or_default(),
    })
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn append(&self, message: NewMessage) -> Result<MessageRecord, ChatError> {
        let now = Utc::now();
        let (media_name, media_type, media_size, media_data) = match &message.media {
            Some(media) => (
                Some(media.name.clone()),
                Some(media.content_type.clone()),
                Some(media.size),
                Some(media.data.clone()),
            ),
            None => (None, None, None, None),
        };

        let row = sqlx::query(
            r#"
            INSERT INTO messages (sender_id, receiver_id, text, media_name, media_type, media_size, media_data, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, sent_at
            "#,
        )
        .bind(message.sender)
        .bind(message.receiver)
        .bind(&message.text)
        .bind(media_name)
        .bind(media_type)
        .bind(media_size)
        .bind(media_data)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(MessageRecord {
            id: row.get("id"),
            sender: message.sender,
            receiver: message.receiver,
            text: message.text,
            media: message.media,
            timestamp: row.get("sent_at"),
            read: false,
        })
    }

    async fn populate(&self, record: &MessageRecord) -> Result<PopulatedMessage, ChatError> {
        let sender = self.fetch_profile(record.sender).await?;
        let receiver = if record.receiver == record.sender {
            sender.clone()
        } else {
            self.fetch_profile(record.receiver).await?
        };

        Ok(PopulatedMessage {
            id: record.id,
            sender,
            receiver,
            text: record.text.clone(),
            media: record.media.clone(),
            timestamp: record.timestamp,
            read: record.read,
        })
    }

    async fn find_conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<PopulatedMessage>, ChatError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.sender_id, m.receiver_id, m.text,
                   m.media_name, m.media_type, m.media_size, m.media_data,
                   m.sent_at, m.is_read,
                   s.name AS sender_name, s.email AS sender_email, s.mobile AS sender_mobile,
                   r.name AS receiver_name, r.email AS receiver_email, r.mobile AS receiver_mobile
            FROM messages m
            JOIN users s ON s.id = m.sender_id
            JOIN users r ON r.id = m.receiver_id
            WHERE (m.sender_id = $1 AND m.receiver_id = $2)
               OR (m.sender_id = $2 AND m.receiver_id = $1)
            ORDER BY m.sent_at ASC, m.id ASC
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(rows
            .into_iter()
            .map(|row| PopulatedMessage {
                id: row.get("id"),
                sender: UserPublic {
                    id: row.get("sender_id"),
                    name: row.get("sender_name"),
                    email: row.get("sender_email"),
                    mobile: row.get("sender_mobile"),
                },
                receiver: UserPublic {
                    id: row.get("receiver_id"),
                    name: row.get("receiver_name"),
                    email: row.get("receiver_email"),
                    mobile: row.get("receiver_mobile"),
                },
                text: row.get("text"),
                media: media_from_row(&row),
                timestamp: row.get("sent_at"),
                read: row.get("is_read"),
            })
            .collect())
    }

    async fn mark_read(&self, recipient: Uuid, sender: Uuid) -> Result<u64, ChatError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE receiver_id = $1 AND sender_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(recipient)
        .bind(sender)
        .execute(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(result.rows_affected())
    }

    async fn unread_counts_for(&self, recipient: Uuid) -> Result<HashMap<Uuid, u64>, ChatError> {
        let rows = sqlx::query(
            r#"
            SELECT sender_id, COUNT(*) AS unread
            FROM messages
            WHERE receiver_id = $1 AND is_read = FALSE
            GROUP BY sender_id
            "#,
        )
        .bind(recipient)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let sender: Uuid = row.get("sender_id");
                let count: i64 = row.get("unread");
                (sender, count as u64)
            })
            .collect())
    }
}
