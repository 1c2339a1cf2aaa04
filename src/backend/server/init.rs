//! Server Initialization
//!
//! Builds the application: database first, then the component graph
//! (store, presence registry, router, tally) inside `AppState`, then the
//! route table.

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, StartupError};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application.
///
/// Fails fast when the database is missing or unmigratable; every other
/// component is in-memory and cannot fail to construct.
pub async fn create_app() -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing wavelink server");

    let pool = load_database().await?;

    let app_state = AppState::new(pool);
    tracing::info!("Conversation store and presence registry initialized");

    Ok(create_router(app_state))
}
