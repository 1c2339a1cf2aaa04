//! Conversation Store
//!
//! Durable record of messages between user pairs. The store is the only
//! component that assigns message ids and timestamps; everything above it
//! (router, tally, HTTP handlers) treats it as a capability behind the
//! `ConversationStore` trait so tests can run against an isolated
//! in-memory instance.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs      - ConversationStore trait
//! ├── postgres.rs - sqlx/Postgres implementation (production)
//! └── memory.rs   - in-memory implementation (tests, same semantics)
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::shared::{ChatError, MessageRecord, NewMessage, PopulatedMessage};

/// Postgres implementation
pub mod postgres;

/// In-memory implementation
pub mod memory;

pub use memory::MemoryConversationStore;
pub use postgres::PgConversationStore;

/// Durable append/query capability over message records.
///
/// Implementations must uphold:
/// - `append` assigns a strictly increasing id and the authoritative
///   timestamp; an unresolvable sender or receiver is a
///   `ChatError::Validation`, any store failure a `ChatError::Persistence`.
/// - `find_conversation` is symmetric in its pair and ordered by timestamp
///   ascending with id as tie-break.
/// - `mark_read` is idempotent; marking with nothing unread is a no-op
///   success.
/// - `unread_counts_for` never reports a zero-count entry.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a validated message, assigning id and timestamp.
    async fn append(&self, message: NewMessage) -> Result<MessageRecord, ChatError>;

    /// Expand a record with sender/receiver display attributes. Read-time
    /// join; the stored record stays normalized.
    async fn populate(&self, record: &MessageRecord) -> Result<PopulatedMessage, ChatError>;

    /// All messages between the unordered pair `{user_a, user_b}`, both
    /// directions, ascending timestamp.
    async fn find_conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<PopulatedMessage>, ChatError>;

    /// Mark every unread message from `sender` to `recipient` as read.
    /// Returns the number of records flipped.
    async fn mark_read(&self, recipient: Uuid, sender: Uuid) -> Result<u64, ChatError>;

    /// Per-sender count of unread messages addressed to `recipient`.
    async fn unread_counts_for(&self, recipient: Uuid) -> Result<HashMap<Uuid, u64>, ChatError>;
}
