//! Social Auth Handler
//!
//! POST /api/auth/social - account creation for identities already
//! verified by an external provider (google, facebook, linkedin). The
//! provider linkage is recorded; a registered email is rejected rather
//! than linked, matching the signup flow's uniqueness rule.

use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, SocialAuthRequest};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_social_user, get_user_by_email};
use crate::backend::error::BackendError;

/// Social auth handler.
pub async fn social_auth(
    State(pool): State<PgPool>,
    Json(request): Json<SocialAuthRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    tracing::info!(
        "[Auth] social auth request for {} via {:?}",
        request.email,
        request.provider
    );

    if request.email.is_empty() || request.password.is_empty() {
        return Err(BackendError::bad_request("Email and password are required"));
    }

    if get_user_by_email(&pool, &request.email).await?.is_some() {
        return Err(BackendError::bad_request(
            "Email is already registered. Please login or use a different email.",
        ));
    }

    // Fall back to the mailbox name when the provider sent no display name.
    let name = request
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| {
            request
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        });

    let password_hash = hash(&request.password, DEFAULT_COST)?;

    let user = create_social_user(
        &pool,
        name,
        request.email,
        password_hash,
        request.provider,
        request.provider_id,
    )
    .await?;

    let token = create_token(user.id, user.email.clone())?;

    tracing::info!("[Auth] social user created: {} ({})", user.name, user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.to_public(),
    }))
}
