//! API Route Configuration
//!
//! # Routes
//!
//! ## Authentication
//! - `POST /api/auth/signup` - local registration
//! - `POST /api/auth/login`  - login with email or mobile
//! - `POST /api/auth/social` - social credential flow
//! - `GET  /api/auth/me`     - current user (requires token)
//!
//! ## Users
//! - `GET    /api/users`      - contact list (requires token)
//! - `PUT    /api/users/{id}` - update own profile
//! - `DELETE /api/users/{id}` - delete own account
//!
//! ## Messaging queries
//! - `GET /api/messages/{other_user_id}` - conversation history
//! - `GET /api/unread`                   - unread tally
//! - `PUT /api/mark-read/{sender_id}`    - clear unread for a sender

use axum::Router;

use crate::backend::auth::handlers::{
    delete_account, get_me, login, signup, social_auth, update_account,
};
use crate::backend::chat::handlers::{get_contacts, get_conversation, get_unread, mark_read};
use crate::backend::server::state::AppState;

/// Add the JSON API routes to the router.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/signup", axum::routing::post(signup))
        .route("/api/auth/login", axum::routing::post(login))
        .route("/api/auth/social", axum::routing::post(social_auth))
        .route("/api/auth/me", axum::routing::get(get_me))
        // User directory and account management
        .route("/api/users", axum::routing::get(get_contacts))
        .route(
            "/api/users/{user_id}",
            axum::routing::put(update_account).delete(delete_account),
        )
        // Conversation queries
        .route(
            "/api/messages/{other_user_id}",
            axum::routing::get(get_conversation),
        )
        .route("/api/unread", axum::routing::get(get_unread))
        .route("/api/mark-read/{sender_id}", axum::routing::put(mark_read))
}
