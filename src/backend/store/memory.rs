//! In-memory conversation store.
//!
//! Mirrors the SQL store's semantics over a mutex-guarded vec: same id
//! assignment, same validation of sender/receiver resolvability, same
//! ordering contract. Backs the test suites that need isolated store
//! instances with no database attached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::ConversationStore;
use crate::shared::{ChatError, MessageRecord, NewMessage, PopulatedMessage, UserPublic};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, UserPublic>,
    messages: Vec<MessageRecord>,
    next_id: i64,
}

/// Isolated, process-local conversation store.
#[derive(Clone, Default)]
pub struct MemoryConversationStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user so submissions referencing it resolve. The SQL store's
    /// counterpart is a row in the users table.
    pub fn add_user(&self, profile: UserPublic) {
        self.inner.lock().unwrap().users.insert(profile.id, profile);
    }

    /// Number of stored messages, for test assertions.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn populate_with(
    users: &HashMap<Uuid, UserPublic>,
    record: &MessageRecord,
) -> Result<PopulatedMessage, ChatError> {
    let sender = users
        .get(&record.sender)
        .cloned()
        .ok_or_else(|| ChatError::validation("sender", "no such user"))?;
    let receiver = users
        .get(&record.receiver)
        .cloned()
        .ok_or_else(|| ChatError::validation("receiver", "no such user"))?;
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

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn append(&self, message: NewMessage) -> Result<MessageRecord, ChatError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.contains_key(&message.sender) {
            return Err(ChatError::validation("sender", "no such user"));
        }
        if !inner.users.contains_key(&message.receiver) {
            return Err(ChatError::validation("receiver", "no such user"));
        }

        inner.next_id += 1;
        let record = MessageRecord {
            id: inner.next_id,
            sender: message.sender,
            receiver: message.receiver,
            text: message.text,
            media: message.media,
            timestamp: Utc::now(),
            read: false,
        };
        inner.messages.push(record.clone());
        Ok(record)
    }

    async fn populate(&self, record: &MessageRecord) -> Result<PopulatedMessage, ChatError> {
        let inner = self.inner.lock().unwrap();
        populate_with(&inner.users, record)
    }

    async fn find_conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<PopulatedMessage>, ChatError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<&MessageRecord> = inner
            .messages
            .iter()
            .filter(|m| {
                (m.sender == user_a && m.receiver == user_b)
                    || (m.sender == user_b && m.receiver == user_a)
            })
            .collect();
        records.sort_by_key(|m| (m.timestamp, m.id));
        records
            .into_iter()
            .map(|record| populate_with(&inner.users, record))
            .collect()
    }

    async fn mark_read(&self, recipient: Uuid, sender: Uuid) -> Result<u64, ChatError> {
        let mut inner = self.inner.lock().unwrap();
        let mut flipped = 0;
        for message in inner.messages.iter_mut() {
            if message.receiver == recipient && message.sender == sender && !message.read {
                message.read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn unread_counts_for(&self, recipient: Uuid) -> Result<HashMap<Uuid, u64>, ChatError> {
        let inner = self.inner.lock().unwrap();
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for message in inner.messages.iter() {
            if message.receiver == recipient && !message.read {
                *counts.entry(message.sender).or_default() += 1;
            }
        }
        Ok(counts)
    }
}
