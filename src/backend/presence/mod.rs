//! Presence Registry
//!
//! Process-wide mapping from user identity to the live connection that can
//! currently reach that user. The registry is an owned instance held in
//! application state and passed to the components that need it, never a
//! hidden global, so tests can stand up isolated registries per case.
//!
//! # Semantics
//!
//! - `register` unconditionally overwrites: one active connection per user,
//!   last writer wins. A superseded connection is not closed; it simply
//!   stops being routable.
//! - `lookup` absence is an ordinary outcome (the user is offline), never
//!   an error.
//! - `remove` scans by connection handle value. A handle that was already
//!   superseded matches nothing, so a late disconnect can never evict the
//!   newer registration.
//!
//! All operations are synchronous in-memory map work; no suspension points.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Sending half of a live connection. Cloneable; the socket's writer task
/// owns the receiving half and drains pushed events into the transport.
/// Equality is by connection id, not by channel identity.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    /// Create a handle and the receiver its writer task will drain.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }

    /// Connection id, unique per accepted transport connection.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Push an event toward the connection. Returns false when the writer
    /// task is gone (connection already torn down); callers treat that the
    /// same as the recipient being offline.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

/// Registry of currently connected users.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    inner: Arc<Mutex<HashMap<Uuid, ConnectionHandle>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `user_id` to `handle`, superseding any previous registration.
    pub fn register(&self, user_id: Uuid, handle: ConnectionHandle) {
        let mut map = self.inner.lock().unwrap();
        if map.insert(user_id, handle).is_some() {
            tracing::debug!("[Presence] re-registered user {}", user_id);
        }
        tracing::info!("[Presence] user {} online ({} active)", user_id, map.len());
    }

    /// The handle currently reaching `user_id`, if any.
    pub fn lookup(&self, user_id: Uuid) -> Option<ConnectionHandle> {
        self.inner.lock().unwrap().get(&user_id).cloned()
    }

    /// Drop the entry owned by `handle`, whatever key it is under. A stale
    /// handle (superseded by a re-register) matches nothing.
    pub fn remove(&self, handle: &ConnectionHandle) {
        let mut map = self.inner.lock().unwrap();
        let owner = map
            .iter()
            .find(|(_, registered)| *registered == handle)
            .map(|(user_id, _)| *user_id);
        if let Some(user_id) = owner {
            map.remove(&user_id);
            tracing::info!("[Presence] user {} offline ({} active)", user_id, map.len());
        }
    }

    /// Number of currently registered users.
    pub fn online_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}
