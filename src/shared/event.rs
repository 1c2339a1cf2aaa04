//! Live-Channel Wire Protocol
//!
//! The events exchanged over a client's persistent connection. Inbound
//! frames are `ClientEvent`; outbound pushes are `ServerEvent`. Both are
//! internally tagged JSON so clients can dispatch on a single `type` field.
//!
//! The submit call returns nothing synchronously; its outcome arrives as
//! either a `delivered` echo (success) or a `submission_failed` event,
//! always addressed to the submitting connection only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::message::{MessageSubmission, PopulatedMessage};

/// Frames a client sends over its live connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Bind this connection to a user identity. Sent once, immediately
    /// after the transport-level connection is ready. A newer registration
    /// for the same user silently supersedes this one.
    Register { user_id: Uuid },
    /// Submit a message for persistence and routing.
    Submit { message: MessageSubmission },
}

/// Frames the server pushes to a live connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A persisted message routed to this connection: either addressed to
    /// it (as recipient) or echoed back (as sender acknowledgment). The
    /// payload carries the store-assigned id and timestamp.
    Delivered { message: PopulatedMessage },
    /// A submission from this connection failed; nothing was delivered.
    SubmissionFailed { reason: String },
}
