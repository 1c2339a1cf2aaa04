//! Chat Module
//!
//! HTTP query surface over the conversation store and unread tally:
//! contacts, history, unread counts, mark-read. Live delivery lives in
//! `backend::realtime`; this module is what clients use to reconcile
//! after a reconnect.

/// Conversation query handlers
pub mod handlers;

pub use handlers::{get_contacts, get_conversation, get_unread, mark_read};
