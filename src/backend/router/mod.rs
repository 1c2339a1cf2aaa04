//! Message Router
//!
//! Consumes a submitted message, persists it, and routes the persisted
//! record to the recipient's live connection when one is registered. The
//! sender always gets the record echoed back on its own connection as the
//! send acknowledgment; that echo is how the client learns the
//! store-assigned id and timestamp and confirms durability.
//!
//! # Pipeline
//!
//! 1. Validate: sender and receiver identifiers must be present. A failed
//!    validation has no network or store effect.
//! 2. Persist via the conversation store. A store failure is returned to
//!    the caller (the transport surfaces it to the submitting connection
//!    only); the recipient is never notified of something that was not
//!    durably recorded.
//! 3. Look up the receiver in the presence registry and push the populated
//!    record if a connection is registered. Absence is not an error.
//! 4. Echo the populated record to the submitting connection.
//!
//! Exactly one store append per call; zero or one delivery to the
//! receiver; exactly one echo to the sender on success.
//!
//! # Ordering
//!
//! Each submission is fully persisted (id and timestamp assigned) before
//! the router touches presence, so successive submissions from one sender
//! reach the recipient in submission order. Submissions from different
//! connections interleave freely; there is no cross-sender ordering
//! contract.

use crate::backend::presence::{ConnectionHandle, PresenceRegistry};
use crate::backend::store::ConversationStore;
use crate::shared::{ChatError, MessageSubmission, NewMessage, PopulatedMessage, ServerEvent};

/// Routes submissions through persistence to live connections.
#[derive(Clone)]
pub struct MessageRouter<S> {
    store: S,
    presence: PresenceRegistry,
}

impl<S: ConversationStore> MessageRouter<S> {
    pub fn new(store: S, presence: PresenceRegistry) -> Self {
        Self { store, presence }
    }

    /// Turn a raw submission into a storable message. The client-supplied
    /// timestamp is advisory and dropped here; the store assigns the
    /// authoritative one.
    fn validate(submission: MessageSubmission) -> Result<NewMessage, ChatError> {
        let sender = submission
            .sender
            .ok_or_else(|| ChatError::validation("sender", "sender is required"))?;
        let receiver = submission
            .receiver
            .ok_or_else(|| ChatError::validation("receiver", "receiver is required"))?;

        Ok(NewMessage {
            sender,
            receiver,
            text: submission.text.unwrap_or_default(),
            media: submission.media,
        })
    }

    /// Persist and route one submission from `origin`.
    ///
    /// On success the populated record has been echoed to `origin` and,
    /// when the receiver is registered, delivered to its connection. On
    /// error nothing has been pushed anywhere; the transport layer owns
    /// telling the submitter.
    pub async fn route(
        &self,
        origin: &ConnectionHandle,
        submission: MessageSubmission,
    ) -> Result<PopulatedMessage, ChatError> {
        let message = Self::validate(submission)?;
        let receiver_id = message.receiver;

        let record = self.store.append(message).await?;
        tracing::info!(
            "[Router] persisted message {} from {} to {}",
            record.id,
            record.sender,
            record.receiver
        );

        let populated = self.store.populate(&record).await?;

        match self.presence.lookup(receiver_id) {
            Some(handle) => {
                if handle.send(ServerEvent::Delivered {
                    message: populated.clone(),
                }) {
                    tracing::info!("[Router] delivered message {} to {}", record.id, receiver_id);
                } else {
                    // Writer task already gone; same outcome as offline.
                    tracing::debug!(
                        "[Router] receiver {} connection closed mid-delivery",
                        receiver_id
                    );
                }
            }
            None => {
                tracing::debug!("[Router] receiver {} offline, stored only", receiver_id);
            }
        }

        // Echo to the sender regardless of the receiver's presence.
        origin.send(ServerEvent::Delivered {
            message: populated.clone(),
        });

        Ok(populated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::MemoryConversationStore;
    use crate::shared::{MessageRecord, UserPublic};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use tokio::sync::mpsc::UnboundedReceiver;
    use uuid::Uuid;

    /// Store whose writes always fail, for exercising the persistence
    /// error path without a database.
    #[derive(Clone)]
    struct FailingStore;

    #[async_trait]
    impl ConversationStore for FailingStore {
        async fn append(&self, _message: NewMessage) -> Result<MessageRecord, ChatError> {
            Err(ChatError::persistence("store unavailable"))
        }

        async fn populate(&self, _record: &MessageRecord) -> Result<PopulatedMessage, ChatError> {
            Err(ChatError::persistence("store unavailable"))
        }

        async fn find_conversation(
            &self,
            _user_a: Uuid,
            _user_b: Uuid,
        ) -> Result<Vec<PopulatedMessage>, ChatError> {
            Ok(Vec::new())
        }

        async fn mark_read(&self, _recipient: Uuid, _sender: Uuid) -> Result<u64, ChatError> {
            Ok(0)
        }

        async fn unread_counts_for(
            &self,
            _recipient: Uuid,
        ) -> Result<HashMap<Uuid, u64>, ChatError> {
            Ok(HashMap::new())
        }
    }

    fn seeded_store() -> (MemoryConversationStore, UserPublic, UserPublic) {
        let store = MemoryConversationStore::new();
        let alice = UserPublic {
            id: Uuid::new_v4(),
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            mobile: None,
        };
        let bob = UserPublic {
            id: Uuid::new_v4(),
            name: "bob".to_string(),
            email: "bob@example.com".to_string(),
            mobile: None,
        };
        store.add_user(alice.clone());
        store.add_user(bob.clone());
        (store, alice, bob)
    }

    fn submission(sender: Uuid, receiver: Uuid, text: &str) -> MessageSubmission {
        MessageSubmission {
            sender: Some(sender),
            receiver: Some(receiver),
            text: Some(text.to_string()),
            media: None,
            client_timestamp: None,
        }
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_missing_receiver_rejected_before_any_effect() {
        let (store, alice, _bob) = seeded_store();
        let presence = PresenceRegistry::new();
        let router = MessageRouter::new(store.clone(), presence);
        let (origin, mut origin_rx) = ConnectionHandle::new();

        let incomplete = MessageSubmission {
            sender: Some(alice.id),
            ..Default::default()
        };
        let err = router.route(&origin, incomplete).await.unwrap_err();

        match err {
            ChatError::Validation { field, .. } => assert_eq!(field, "receiver"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.is_empty());
        assert!(drain(&mut origin_rx).is_empty());
    }

    #[tokio::test]
    async fn test_offline_receiver_gets_stored_only() {
        let (store, alice, bob) = seeded_store();
        let presence = PresenceRegistry::new();
        let router = MessageRouter::new(store.clone(), presence);
        let (origin, mut origin_rx) = ConnectionHandle::new();

        let routed = router
            .route(&origin, submission(alice.id, bob.id, "hi"))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(!routed.read);

        // Exactly one event on the origin connection: the echo.
        let events = drain(&mut origin_rx);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ServerEvent::Delivered { message } => assert_eq!(message.id, routed.id),
            other => panic!("expected echo, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_online_receiver_gets_delivery_and_sender_gets_echo() {
        let (store, alice, bob) = seeded_store();
        let presence = PresenceRegistry::new();
        let router = MessageRouter::new(store, presence.clone());

        let (origin, mut origin_rx) = ConnectionHandle::new();
        let (bob_handle, mut bob_rx) = ConnectionHandle::new();
        presence.register(bob.id, bob_handle);

        let routed = router
            .route(&origin, submission(alice.id, bob.id, "hello"))
            .await
            .unwrap();

        let to_bob = drain(&mut bob_rx);
        assert_eq!(to_bob.len(), 1);
        match &to_bob[0] {
            ServerEvent::Delivered { message } => {
                assert_eq!(message.id, routed.id);
                assert_eq!(message.sender.name, "alice");
            }
            other => panic!("expected delivery, got {:?}", other),
        }

        assert_eq!(drain(&mut origin_rx).len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_reaches_nobody() {
        let presence = PresenceRegistry::new();
        let router = MessageRouter::new(FailingStore, presence.clone());

        let receiver_id = Uuid::new_v4();
        let (origin, mut origin_rx) = ConnectionHandle::new();
        let (receiver_handle, mut receiver_rx) = ConnectionHandle::new();
        presence.register(receiver_id, receiver_handle);

        let err = router
            .route(&origin, submission(Uuid::new_v4(), receiver_id, "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Persistence { .. }));
        assert!(drain(&mut receiver_rx).is_empty());
        assert!(drain(&mut origin_rx).is_empty());
    }

    #[tokio::test]
    async fn test_same_sender_submissions_stay_ordered() {
        let (store, alice, bob) = seeded_store();
        let presence = PresenceRegistry::new();
        let router = MessageRouter::new(store, presence.clone());

        let (origin, _origin_rx) = ConnectionHandle::new();
        let (bob_handle, mut bob_rx) = ConnectionHandle::new();
        presence.register(bob.id, bob_handle);

        router
            .route(&origin, submission(alice.id, bob.id, "first"))
            .await
            .unwrap();
        router
            .route(&origin, submission(alice.id, bob.id, "second"))
            .await
            .unwrap();

        let events = drain(&mut bob_rx);
        assert_eq!(events.len(), 2);
        let ids: Vec<i64> = events
            .iter()
            .map(|event| match event {
                ServerEvent::Delivered { message } => message.id,
                other => panic!("expected delivery, got {:?}", other),
            })
            .collect();
        assert!(ids[0] < ids[1]);
    }

    #[tokio::test]
    async fn test_client_timestamp_is_advisory_only() {
        let (store, alice, bob) = seeded_store();
        let router = MessageRouter::new(store, PresenceRegistry::new());
        let (origin, _origin_rx) = ConnectionHandle::new();

        let mut stale = submission(alice.id, bob.id, "old?");
        stale.client_timestamp = Some(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap());

        let routed = router.route(&origin, stale).await.unwrap();
        // Store-assigned time, not the advisory one from the client.
        assert!(routed.timestamp.timestamp() > 946_684_800);
    }

    #[tokio::test]
    async fn test_media_only_submission_defaults_text_empty() {
        let (store, alice, bob) = seeded_store();
        let router = MessageRouter::new(store, PresenceRegistry::new());
        let (origin, _origin_rx) = ConnectionHandle::new();

        let media_only = MessageSubmission {
            sender: Some(alice.id),
            receiver: Some(bob.id),
            text: None,
            media: Some(crate::shared::MediaAttachment {
                name: "voice.ogg".to_string(),
                content_type: "audio/ogg".to_string(),
                size: 4,
                data: vec![0, 1, 2, 3],
            }),
            client_timestamp: None,
        };

        let routed = router.route(&origin, media_only).await.unwrap();
        assert_eq!(routed.text, "");
        assert!(routed.media.is_some());
    }
}
