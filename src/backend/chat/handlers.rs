//! Conversation Query Handlers
//!
//! The request/response side of the messaging core: contact listing,
//! history fetch, unread tallies, and mark-read. These are the endpoints
//! a client hits on reconnect to converge with the persisted state after
//! any missed live deliveries.
//!
//! All endpoints resolve the calling user from the bearer token.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::handlers::extract_user_id;
use crate::backend::auth::users::list_users;
use crate::backend::error::BackendError;
use crate::backend::store::{ConversationStore, PgConversationStore};
use crate::backend::tally::UnreadTally;
use crate::shared::{PopulatedMessage, UserPublic};

/// GET /api/users - every user's public profile, for the contact list.
pub async fn get_contacts(
    State(pool): State<PgPool>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserPublic>>, BackendError> {
    let _caller = extract_user_id(&headers)?;

    let users = list_users(&pool).await?;
    Ok(Json(users.iter().map(|user| user.to_public()).collect()))
}

/// GET /api/messages/{other_user_id} - full conversation between the
/// caller and the addressed user, ascending by time, populated.
pub async fn get_conversation(
    State(store): State<PgConversationStore>,
    headers: HeaderMap,
    Path(other_user_id): Path<Uuid>,
) -> Result<Json<Vec<PopulatedMessage>>, BackendError> {
    let caller = extract_user_id(&headers)?;

    let messages = store.find_conversation(caller, other_user_id).await?;
    tracing::debug!(
        "[Chat] history fetch {} <-> {}: {} messages",
        caller,
        other_user_id,
        messages.len()
    );
    Ok(Json(messages))
}

/// GET /api/unread - sender id -> unread count for the caller. Senders
/// with nothing unread are absent.
pub async fn get_unread(
    State(tally): State<UnreadTally<PgConversationStore>>,
    headers: HeaderMap,
) -> Result<Json<HashMap<Uuid, u64>>, BackendError> {
    let caller = extract_user_id(&headers)?;

    let counts = tally.tally(caller).await?;
    Ok(Json(counts))
}

/// PUT /api/mark-read/{sender_id} - clear the caller's unread flag for
/// everything from that sender. Repeating the call is a no-op success.
pub async fn mark_read(
    State(tally): State<UnreadTally<PgConversationStore>>,
    headers: HeaderMap,
    Path(sender_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let caller = extract_user_id(&headers)?;

    tally.mark_read(caller, sender_id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Messages marked as read" }),
    ))
}
