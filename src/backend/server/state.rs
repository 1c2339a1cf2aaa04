//! Application State
//!
//! Central state container handed to the Axum router. Holds the database
//! pool, the conversation store over it, the presence registry, and the
//! router/tally components built from those two. Everything is cheaply
//! cloneable (pools and registries are handles), and `FromRef`
//! implementations let handlers extract just the piece they need.
//!
//! The presence registry lives here as an owned instance - components
//! receive it at construction, so tests can build an isolated state (or
//! just the components) per case instead of sharing a process global.

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::presence::PresenceRegistry;
use crate::backend::router::MessageRouter;
use crate::backend::store::PgConversationStore;
use crate::backend::tally::UnreadTally;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database pool, used directly by the auth/user handlers
    pub pool: PgPool,
    /// Conversation store over the pool
    pub store: PgConversationStore,
    /// Live-connection registry
    pub presence: PresenceRegistry,
    /// Persist-and-deliver pipeline
    pub router: MessageRouter<PgConversationStore>,
    /// Unread bookkeeping
    pub tally: UnreadTally<PgConversationStore>,
}

impl AppState {
    /// Wire the component graph over one pool.
    pub fn new(pool: PgPool) -> Self {
        let store = PgConversationStore::new(pool.clone());
        let presence = PresenceRegistry::new();
        let router = MessageRouter::new(store.clone(), presence.clone());
        let tally = UnreadTally::new(store.clone());
        Self {
            pool,
            store,
            presence,
            router,
            tally,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for PgConversationStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for PresenceRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.presence.clone()
    }
}

impl FromRef<AppState> for MessageRouter<PgConversationStore> {
    fn from_ref(state: &AppState) -> Self {
        state.router.clone()
    }
}

impl FromRef<AppState> for UnreadTally<PgConversationStore> {
    fn from_ref(state: &AppState) -> Self {
        state.tally.clone()
    }
}
