//! HTTP handlers for authentication and account endpoints.
//!
//! ```text
//! handlers/
//! ├── mod.rs     - exports + bearer-token extraction
//! ├── types.rs   - request/response types
//! ├── signup.rs  - POST /api/auth/signup
//! ├── login.rs   - POST /api/auth/login
//! ├── social.rs  - POST /api/auth/social
//! ├── me.rs      - GET  /api/auth/me
//! └── account.rs - PUT/DELETE /api/users/{id}
//! ```

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::error::BackendError;

pub mod account;
pub mod login;
pub mod me;
pub mod signup;
pub mod social;
pub mod types;

pub use account::{delete_account, update_account};
pub use login::login;
pub use me::get_me;
pub use signup::signup;
pub use social::social_auth;

/// Extract and verify the bearer token, returning the authenticated
/// user id.
pub fn extract_user_id(headers: &HeaderMap) -> Result<Uuid, BackendError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| BackendError::unauthorized("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| BackendError::unauthorized("Malformed authorization header"))?;

    let claims = verify_token(token)?;

    Uuid::parse_str(&claims.sub)
        .map_err(|_| BackendError::unauthorized("Invalid user id in token"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::sessions::create_token;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_user_id_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, "a@example.com".to_string()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        assert_eq!(extract_user_id(&headers).unwrap(), user_id);
    }

    #[test]
    fn test_extract_user_id_missing_header() {
        let err = extract_user_id(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_extract_user_id_without_bearer_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("token abc"));
        let err = extract_user_id(&headers).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
