//! Current-user handler: GET /api/auth/me.

use axum::{extract::State, http::HeaderMap, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::extract_user_id;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::shared::UserPublic;

/// Return the authenticated user's public profile.
pub async fn get_me(
    State(pool): State<PgPool>,
    headers: HeaderMap,
) -> Result<Json<UserPublic>, BackendError> {
    let user_id = extract_user_id(&headers)?;

    let user = get_user_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(user.to_public()))
}
