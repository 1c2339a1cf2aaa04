//! Unread Tally Service
//!
//! Derives per-sender unread counts for a recipient and clears them in
//! bulk. Pull/command-only: callers re-fetch or optimistically zero their
//! local tally after a mark-read; nothing is pushed when counts change.
//!
//! Per (recipient, sender) pair the count only ever moves
//! `0 -> N -> 0`; there is no decrement other than the full reset.

use std::collections::HashMap;

use uuid::Uuid;

use crate::backend::store::ConversationStore;
use crate::shared::ChatError;

/// Store-backed unread bookkeeping.
#[derive(Clone)]
pub struct UnreadTally<S> {
    store: S,
}

impl<S: ConversationStore> UnreadTally<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Sender -> unread count for `user`. Senders with nothing unread are
    /// absent, never present with a zero.
    pub async fn tally(&self, user: Uuid) -> Result<HashMap<Uuid, u64>, ChatError> {
        self.store.unread_counts_for(user).await
    }

    /// Clear the unread flag on everything `sender` has sent `recipient`.
    /// Idempotent; clearing an already-clear pair is a no-op success.
    pub async fn mark_read(&self, recipient: Uuid, sender: Uuid) -> Result<u64, ChatError> {
        let flipped = self.store.mark_read(recipient, sender).await?;
        if flipped > 0 {
            tracing::info!(
                "[Tally] cleared {} unread from {} for {}",
                flipped,
                sender,
                recipient
            );
        }
        Ok(flipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::MemoryConversationStore;
    use crate::shared::{NewMessage, UserPublic};

    fn seeded() -> (UnreadTally<MemoryConversationStore>, Uuid, Uuid) {
        let store = MemoryConversationStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.add_user(UserPublic {
            id: alice,
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            mobile: None,
        });
        store.add_user(UserPublic {
            id: bob,
            name: "bob".to_string(),
            email: "bob@example.com".to_string(),
            mobile: None,
        });
        (UnreadTally::new(store), alice, bob)
    }

    async fn send(tally: &UnreadTally<MemoryConversationStore>, from: Uuid, to: Uuid) {
        tally
            .store
            .append(NewMessage {
                sender: from,
                receiver: to,
                text: "ping".to_string(),
                media: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_tally_counts_then_resets_to_empty() {
        let (tally, alice, bob) = seeded();
        send(&tally, alice, bob).await;
        send(&tally, alice, bob).await;

        let counts = tally.tally(bob).await.unwrap();
        assert_eq!(counts.get(&alice), Some(&2));

        tally.mark_read(bob, alice).await.unwrap();
        let counts = tally.tally(bob).await.unwrap();
        // Entry absent entirely, never zero-valued.
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_mark_read_twice_is_noop_success() {
        let (tally, alice, bob) = seeded();
        send(&tally, alice, bob).await;

        assert_eq!(tally.mark_read(bob, alice).await.unwrap(), 1);
        assert_eq!(tally.mark_read(bob, alice).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_is_directional() {
        let (tally, alice, bob) = seeded();
        send(&tally, alice, bob).await;
        send(&tally, bob, alice).await;

        tally.mark_read(bob, alice).await.unwrap();

        // Bob's unread from Alice is cleared; Alice's unread from Bob is not.
        assert!(tally.tally(bob).await.unwrap().is_empty());
        assert_eq!(tally.tally(alice).await.unwrap().get(&bob), Some(&1));
    }
}
