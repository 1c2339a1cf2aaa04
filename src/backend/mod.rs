//! Backend Module
//!
//! All server-side code: the messaging core (store, presence, router,
//! tally), the live-channel transport, authentication, and the HTTP route
//! table.
//!
//! # Architecture
//!
//! ```text
//! backend/
//! ├── server/   - initialization, AppState, configuration
//! ├── routes/   - route table assembly
//! ├── store/    - conversation store (trait + Postgres + in-memory)
//! ├── presence/ - user -> live connection registry
//! ├── router/   - persist-and-deliver pipeline
//! ├── tally/    - unread bookkeeping
//! ├── realtime/ - WebSocket session handling
//! ├── chat/     - conversation query handlers
//! ├── auth/     - accounts, credentials, JWT sessions
//! └── error/    - HTTP error types
//! ```
//!
//! # Data flow
//!
//! A live connection registers its user in the presence registry; each
//! submitted message is persisted by the store, then pushed to the
//! recipient's registered connection (if any) and echoed to the sender.
//! The query surface in `chat` serves history and unread tallies so a
//! client that reconnects converges with the store.
//!
//! The presence registry is the only shared mutable structure; it is an
//! owned instance inside `AppState`, mutated only by register/remove
//! under last-writer-wins semantics. Store consistency is delegated to
//! Postgres.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Conversation store
pub mod store;

/// Presence registry
pub mod presence;

/// Message router
pub mod router;

/// Unread tally service
pub mod tally;

/// Live-channel transport
pub mod realtime;

/// Conversation query handlers
pub mod chat;

/// Authentication and user management
pub mod auth;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use presence::{ConnectionHandle, PresenceRegistry};
pub use router::MessageRouter;
pub use server::create_app;
pub use store::{ConversationStore, MemoryConversationStore, PgConversationStore};
pub use tally::UnreadTally;
