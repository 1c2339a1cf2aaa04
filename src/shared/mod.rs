//! Shared Module
//!
//! Types that cross the wire between the server and any client: message
//! records, user profiles, live-channel events, and the core error
//! taxonomy. Everything here is plain serde data with no backend
//! dependencies.

/// Message record, submission, and media types
pub mod message;

/// Public user profile
pub mod user;

/// Live-channel wire protocol events
pub mod event;

/// Shared error taxonomy
pub mod error;

/// Re-export commonly used types for convenience
pub use error::ChatError;
pub use event::{ClientEvent, ServerEvent};
pub use message::{MediaAttachment, MessageRecord, MessageSubmission, NewMessage, PopulatedMessage};
pub use user::UserPublic;
