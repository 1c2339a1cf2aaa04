//! Authentication handler request/response types.

use serde::{Deserialize, Serialize};

use crate::shared::UserPublic;

/// Sign up request
#[derive(Deserialize, Serialize, Debug)]
pub struct SignupRequest {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Mobile number, optional
    pub mobile: Option<String>,
    /// Password (hashed before storage)
    pub password: String,
}

/// Login request - the identifier field accepts email or mobile.
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    #[serde(alias = "email_or_mobile")]
    pub identifier: String,
    pub password: String,
}

/// Social credential flow request. The provider has already verified the
/// identity; we only record the linkage.
#[derive(Deserialize, Serialize, Debug)]
pub struct SocialAuthRequest {
    pub email: String,
    pub name: Option<String>,
    pub provider: Option<String>,
    pub provider_id: Option<String>,
    pub password: String,
}

/// Auth response: the JWT plus the public profile.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// JWT token (30-day expiration)
    pub token: String,
    /// User information, without sensitive data
    pub user: UserPublic,
}

/// Account update request; absent fields keep their stored value.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
}
