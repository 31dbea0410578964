//! WebSocket upgrade handler.
//!
//! Every socket starts in the public room and immediately receives a fresh
//! public listing. `admin_connect` with the right password moves it to the
//! admin room; `admin_leave` moves it back.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use kiosk_core::error::AppError;
use kiosk_core::types::id::ConnectionId;
use kiosk_realtime::{Audience, InboundMessage, OutboundMessage};

use crate::state::AppState;

/// GET /ws
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let mut shutdown = state.realtime.shutdown_receiver();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = match state.realtime.connections.register() {
        Ok(registered) => registered,
        Err(e) => {
            warn!(error = %e, "WebSocket connection refused");
            let _ = ws_tx.send(Message::Close(None)).await;
            return;
        }
    };
    let conn_id = handle.id;

    info!(conn_id = %conn_id, "WebSocket connection established");

    let outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    send_listing(&state, &conn_id, Audience::Public).await;

    loop {
        tokio::select! {
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Some(message) = state
                        .realtime
                        .connections
                        .handle_inbound(&conn_id, text.as_str())
                        .await
                    {
                        handle_message(&state, &conn_id, message).await;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Protocol pings are answered by axum.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = shutdown.recv() => {
                debug!(conn_id = %conn_id, "Closing WebSocket for shutdown");
                break;
            }
        }
    }

    outbound_task.abort();
    state.realtime.connections.unregister(&conn_id);

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

/// Room changes that need the admin secret or fresh queue data.
async fn handle_message(state: &AppState, conn_id: &ConnectionId, message: InboundMessage) {
    let connections = &state.realtime.connections;
    match message {
        InboundMessage::AdminConnect { password } => {
            if state.config.admin.verify(password.as_deref().unwrap_or_default()) {
                connections.join(conn_id, Audience::Admin);
                connections.send_to(
                    conn_id,
                    &OutboundMessage::AdminStatus {
                        role: Audience::Admin.as_str().to_string(),
                    },
                );
                send_listing(state, conn_id, Audience::Admin).await;
                info!(conn_id = %conn_id, "Connection joined admin room");
            } else {
                warn!(conn_id = %conn_id, "Admin connect with invalid password");
                connections.send_to(
                    conn_id,
                    &OutboundMessage::AdminError {
                        error: "Invalid password".to_string(),
                    },
                );
            }
        }
        InboundMessage::AdminLeave => {
            connections.join(conn_id, Audience::Public);
            send_listing(state, conn_id, Audience::Public).await;
        }
        InboundMessage::Ping => {}
    }
}

/// Push the current listing for `audience` to one connection.
async fn send_listing(state: &AppState, conn_id: &ConnectionId, audience: Audience) {
    let frame = match audience {
        Audience::Public => state
            .service
            .public_listing()
            .await
            .and_then(|update| OutboundMessage::queue_update(&update).map_err(AppError::from)),
        Audience::Admin => state
            .service
            .admin_listing()
            .await
            .and_then(|update| OutboundMessage::queue_update(&update).map_err(AppError::from)),
    };

    match frame {
        Ok(message) => {
            state.realtime.connections.send_to(conn_id, &message);
        }
        Err(e) => warn!(conn_id = %conn_id, error = %e, "Failed to build queue listing"),
    }
}
