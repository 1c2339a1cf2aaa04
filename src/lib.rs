//! Wavelink - Main Library
//!
//! Wavelink is a two-party real-time chat server: accounts sign up or
//! arrive through a social credential flow, see a contact list, and
//! exchange text/media messages over a persistent WebSocket connection
//! with PostgreSQL-backed history and unread counts.
//!
//! # Module Structure
//!
//! - **`shared`** - wire types any client speaks: message records, user
//!   profiles, live-channel events, the core error taxonomy
//! - **`backend`** - the server: conversation store, presence registry,
//!   message router, unread tally, transport, auth, routes
//!
//! # Delivery model
//!
//! One active connection per user, tracked in the presence registry
//! (last writer wins). A submitted message is durably persisted before
//! any delivery is attempted; the recipient gets a push only if
//! currently registered, and the sender always receives the persisted
//! record back as its acknowledgment. Offline recipients converge by
//! fetching conversation history on reconnect - record ids are stable,
//! so re-fetching is idempotent.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
