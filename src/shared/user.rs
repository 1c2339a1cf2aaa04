//! Public User Profile
//!
//! The display-facing view of a user. This is the only user shape that ever
//! crosses the wire; password hashes and provider ids stay in the backend.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User profile safe to embed in delivered messages and directory listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPublic {
    /// Unique user ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Contact email address
    pub email: String,
    /// Contact mobile number, absent for social-auth accounts
    pub mobile: Option<String>,
}
