//! Login Handler
//!
//! POST /api/auth/login - authenticate with email-or-mobile plus password.
//! Unknown identifier and wrong password both come back 401 so the
//! response does not reveal which accounts exist.

use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::get_user_by_email_or_mobile;
use crate::backend::error::BackendError;

/// Login handler.
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    tracing::info!("[Auth] login request for {}", request.identifier);

    let user = get_user_by_email_or_mobile(&pool, &request.identifier)
        .await?
        .ok_or_else(|| {
            tracing::warn!("[Auth] user not found: {}", request.identifier);
            BackendError::unauthorized("Invalid credentials")
        })?;

    // Social accounts created without a local password cannot log in here.
    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| BackendError::unauthorized("Invalid credentials"))?;

    if !verify(&request.password, password_hash)? {
        tracing::warn!("[Auth] invalid password for {}", request.identifier);
        return Err(BackendError::unauthorized("Invalid credentials"));
    }

    let token = create_token(user.id, user.email.clone())?;

    tracing::info!("[Auth] user logged in: {} ({})", user.name, user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.to_public(),
    }))
}
