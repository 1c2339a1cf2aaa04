//! Live Connection Handler
//!
//! WebSocket endpoint for the persistent client channel (`GET /ws`). Each
//! accepted socket gets a `ConnectionHandle`; a writer task drains the
//! handle's channel into the socket while the reader loop consumes client
//! frames.
//!
//! # Session lifecycle
//!
//! 1. Client connects and sends a `register` frame binding the connection
//!    to a user id. Re-registration (same user, new connection) silently
//!    supersedes the old entry.
//! 2. `submit` frames run through the message router one at a time - the
//!    reader awaits each route before pulling the next frame, which is
//!    what gives same-sender submissions their ordering guarantee.
//! 3. On socket close (or transport error) the handle is removed from the
//!    presence registry. A handle superseded by a newer registration
//!    removes nothing.
//!
//! Submission outcomes never come back as request/response: success is the
//! `delivered` echo pushed through the handle, failure a
//! `submission_failed` event to this connection only. Unparseable frames
//! also get a `submission_failed` and the connection stays up.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use crate::backend::presence::ConnectionHandle;
use crate::backend::server::state::AppState;
use crate::shared::{ClientEvent, ServerEvent};

/// Handle the WebSocket upgrade (GET /ws).
pub async fn handle_socket_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_session(socket, state))
}

/// Drive one connection until it closes.
async fn run_session(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (handle, mut events_rx) = ConnectionHandle::new();
    tracing::info!("[Socket] connection {} established", handle.id());

    // Writer task: serialize pushed events onto the wire. Ends when the
    // handle's last sender is dropped or the socket goes away.
    let writer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!("[Socket] failed to serialize event: {:?}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let mut registered_user: Option<Uuid> = None;

    while let Some(frame) = stream.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("[Socket] transport error on {}: {:?}", handle.id(), e);
                break;
            }
        };

        match frame {
            Message::Text(text) => {
                handle_frame(&state, &handle, &mut registered_user, text.as_str()).await;
            }
            Message::Close(_) => break,
            // Ping/pong are answered by axum; binary frames are not part
            // of the protocol.
            _ => {}
        }
    }

    // Transport-level close: drop this connection's presence entry. If a
    // newer registration superseded this handle, the remove is a no-op.
    state.presence.remove(&handle);
    writer.abort();
    match registered_user {
        Some(user_id) => tracing::info!(
            "[Socket] connection {} for user {} closed ({} online)",
            handle.id(),
            user_id,
            state.presence.online_count()
        ),
        None => tracing::info!("[Socket] unregistered connection {} closed", handle.id()),
    }
}

/// Dispatch a single inbound frame.
async fn handle_frame(
    state: &AppState,
    handle: &ConnectionHandle,
    registered_user: &mut Option<Uuid>,
    raw: &str,
) {
    let event: ClientEvent = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("[Socket] unparseable frame on {}: {}", handle.id(), e);
            handle.send(ServerEvent::SubmissionFailed {
                reason: format!("unrecognized frame: {}", e),
            });
            return;
        }
    };

    match event {
        ClientEvent::Register { user_id } => {
            state.presence.register(user_id, handle.clone());
            *registered_user = Some(user_id);
        }
        ClientEvent::Submit { message } => {
            // route() pushes the echo/delivery itself; only failures need
            // surfacing here, and only to this connection.
            if let Err(e) = state.router.route(handle, message).await {
                tracing::warn!("[Socket] submission failed on {}: {}", handle.id(), e);
                handle.send(ServerEvent::SubmissionFailed {
                    reason: e.to_string(),
                });
            }
        }
    }
}
