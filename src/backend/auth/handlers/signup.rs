//! Signup Handler
//!
//! POST /api/auth/signup - local registration.
//!
//! 1. Validate email shape and password length
//! 2. Reject an email or mobile that is already registered
//! 3. Hash the password with bcrypt
//! 4. Create the user and return a JWT for immediate authentication
//!
//! Passwords are hashed with DEFAULT_COST and never returned.

use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_mobile};
use crate::backend::error::BackendError;

/// Sign up handler.
pub async fn signup(
    State(pool): State<PgPool>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    tracing::info!("[Auth] signup request for {}", request.email);

    if request.name.trim().is_empty() {
        return Err(BackendError::bad_request("Name is required"));
    }
    if !request.email.contains('@') {
        return Err(BackendError::bad_request("Invalid email format"));
    }
    if request.password.len() < 8 {
        return Err(BackendError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    if get_user_by_email(&pool, &request.email).await?.is_some() {
        return Err(BackendError::conflict("Email or mobile already in use"));
    }
    if let Some(mobile) = request.mobile.as_deref() {
        if get_user_by_mobile(&pool, mobile).await?.is_some() {
            return Err(BackendError::conflict("Email or mobile already in use"));
        }
    }

    let password_hash = hash(&request.password, DEFAULT_COST)?;

    let user = create_user(
        &pool,
        request.name,
        request.email,
        request.mobile,
        password_hash,
    )
    .await?;

    let token = create_token(user.id, user.email.clone())?;

    tracing::info!("[Auth] user created: {} ({})", user.name, user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.to_public(),
    }))
}
