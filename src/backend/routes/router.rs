//! Router Configuration
//!
//! Combines the live-channel endpoint and the JSON API into the single
//! Axum router the server binds. CORS is permissive; TLS and anything
//! stricter belongs to the proxy in front.

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::backend::realtime::socket::handle_socket_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured.
pub fn create_router(app_state: AppState) -> Router<()> {
    // The live channel first, then the request/response API.
    let router = Router::new().route("/ws", axum::routing::get(handle_socket_upgrade));

    let router = configure_api_routes(router);

    // Fallback handler for 404
    let router = router.fallback(|| async { "404 Not Found" });

    router.layer(CorsLayer::permissive()).with_state(app_state)
}
