//! Message Data Structures
//!
//! The persisted message record, its optional media attachment, the
//! client-side submission shape, and the populated view delivered to
//! connections.
//!
//! A `MessageRecord` is immutable once persisted except for the `read`
//! flag, which only ever moves false -> true. Sender and receiver are
//! stored as bare ids; display attributes are joined in on the way out
//! (`PopulatedMessage`), never written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::user::UserPublic;

/// Inline media attachment. At most one per message; the payload rides
/// inside the record itself (no blob store).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaAttachment {
    /// Original file name
    pub name: String,
    /// MIME type, e.g. "image/png"
    #[serde(rename = "type")]
    pub content_type: String,
    /// Payload size in bytes
    pub size: i64,
    /// Raw payload, base64 on the wire
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// A message as persisted by the conversation store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRecord {
    /// Store-assigned id; strictly increasing with insertion order
    pub id: i64,
    /// Sender user id
    pub sender: Uuid,
    /// Receiver user id
    pub receiver: Uuid,
    /// Message text; empty string for media-only messages
    #[serde(default)]
    pub text: String,
    /// Optional media attachment
    pub media: Option<MediaAttachment>,
    /// Store-assigned creation time
    pub timestamp: DateTime<Utc>,
    /// Read flag, false until the recipient marks the conversation read
    pub read: bool,
}

/// A message record expanded with sender/receiver display attributes.
/// This is the shape pushed over live connections and returned by
/// history fetches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopulatedMessage {
    pub id: i64,
    pub sender: UserPublic,
    pub receiver: UserPublic,
    #[serde(default)]
    pub text: String,
    pub media: Option<MediaAttachment>,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// A client-submitted message, before validation. Sender and receiver are
/// optional so that incomplete submissions reach the router and fail with
/// a validation error instead of a parse error; the client timestamp is
/// advisory only and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessageSubmission {
    pub sender: Option<Uuid>,
    pub receiver: Option<Uuid>,
    pub text: Option<String>,
    pub media: Option<MediaAttachment>,
    #[serde(default, rename = "timestamp")]
    pub client_timestamp: Option<DateTime<Utc>>,
}

/// A validated submission ready for the store. Produced by the router,
/// consumed by `ConversationStore::append`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: Uuid,
    pub receiver: Uuid,
    pub text: String,
    pub media: Option<MediaAttachment>,
}

/// Serde adapter: `Vec<u8>` as a base64 string on the wire.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_tolerates_missing_identifiers() {
        // Incomplete submissions must parse; the router rejects them.
        let json = r#"{"text":"hi"}"#;
        let submission: MessageSubmission = serde_json::from_str(json).unwrap();
        assert!(submission.sender.is_none());
        assert!(submission.receiver.is_none());
        assert_eq!(submission.text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_media_rides_as_base64() {
        let media = MediaAttachment {
            name: "pic.png".to_string(),
            content_type: "image/png".to_string(),
            size: 3,
            data: vec![1, 2, 3],
        };
        let json = serde_json::to_string(&media).unwrap();
        assert!(json.contains("\"AQID\""));
        let back: MediaAttachment = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_media_rejects_invalid_base64() {
        let json = r#"{"name":"x","type":"text/plain","size":1,"data":"%%%"}"#;
        assert!(serde_json::from_str::<MediaAttachment>(json).is_err());
    }

    #[test]
    fn test_client_timestamp_is_optional() {
        let json = r#"{"sender":"7f1ddca6-7224-4bfa-a01f-b1e18a1601d4",
                       "receiver":"04e1a9f3-9a3a-4bd2-9cf7-7dd0b9e3c833",
                       "timestamp":"2026-01-05T10:00:00Z"}"#;
        let submission: MessageSubmission = serde_json::from_str(json).unwrap();
        assert!(submission.client_timestamp.is_some());
        assert!(submission.text.is_none());
    }
}
