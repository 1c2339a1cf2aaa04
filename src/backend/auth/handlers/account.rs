//! Account management handlers: PUT and DELETE /api/users/{id}.
//!
//! Both operations require the bearer token to match the addressed
//! account; there is no admin surface.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::handlers::extract_user_id;
use crate::backend::auth::handlers::types::UpdateAccountRequest;
use crate::backend::auth::users::{delete_user, update_user};
use crate::backend::error::BackendError;
use crate::shared::UserPublic;

/// Update the authenticated user's profile fields.
pub async fn update_account(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<UserPublic>, BackendError> {
    let caller = extract_user_id(&headers)?;
    if caller != user_id {
        return Err(BackendError::forbidden("Cannot modify another account"));
    }

    let user = update_user(&pool, user_id, request.name, request.mobile)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("[Auth] account updated: {}", user.id);
    Ok(Json(user.to_public()))
}

/// Delete the authenticated user's account.
pub async fn delete_account(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let caller = extract_user_id(&headers)?;
    if caller != user_id {
        return Err(BackendError::forbidden("Cannot delete another account"));
    }

    if !delete_user(&pool, user_id).await? {
        return Err(BackendError::not_found("User not found"));
    }

    tracing::info!("[Auth] account deleted: {}", user_id);
    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}
