//! Connection manager: registration, room moves and frame routing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use kiosk_core::config::RealtimeConfig;
use kiosk_core::error::AppError;
use kiosk_core::types::id::ConnectionId;

use crate::channel::{Audience, RoomRegistry};
use crate::message::serializer;
use crate::message::types::{InboundMessage, OutboundMessage};
use crate::metrics::RealtimeMetrics;

use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;

/// Owns every live WebSocket and its room membership.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: Arc<ConnectionPool>,
    rooms: Arc<RoomRegistry>,
    metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Create a manager over shared rooms and metrics.
    pub fn new(
        config: RealtimeConfig,
        rooms: Arc<RoomRegistry>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            rooms,
            metrics,
            config,
        }
    }

    /// Accept a new connection into the public room.
    ///
    /// Returns the handle and the receiver the socket writer drains.
    pub fn register(&self) -> Result<(Arc<ConnectionHandle>, mpsc::Receiver<String>), AppError> {
        if self.pool.connection_count() >= self.config.max_connections {
            warn!(
                max = self.config.max_connections,
                "Rejecting WebSocket connection, pool is full"
            );
            return Err(AppError::capacity("Too many realtime connections"));
        }

        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(tx));

        self.pool.add(handle.clone());
        self.rooms.join(handle.id, Audience::Public);
        self.metrics.connection_opened();

        info!(conn_id = %handle.id, "WebSocket connection registered");
        Ok((handle, rx))
    }

    /// Drop a connection and its room membership.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_closed();
            self.rooms.leave(*conn_id);
            self.metrics.connection_closed();
            info!(conn_id = %conn_id, "WebSocket connection unregistered");
        }
    }

    /// Move a connection to another room.
    pub fn join(&self, conn_id: &ConnectionId, audience: Audience) {
        if self.pool.get(conn_id).is_none() {
            warn!(conn_id = %conn_id, "Room change for unknown connection");
            return;
        }
        let previous = self.rooms.join(*conn_id, audience);
        debug!(conn_id = %conn_id, from = ?previous, to = %audience, "Connection changed room");
    }

    /// Parse an inbound frame.
    ///
    /// Pings are answered here. Malformed frames get an error reply. Room
    /// changes that need authorization or fresh data are returned to the
    /// caller.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) -> Option<InboundMessage> {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Frame from unknown connection");
            return None;
        };
        handle.touch().await;
        self.metrics.message_received();

        match serializer::deserialize_inbound(raw) {
            Ok(InboundMessage::Ping) => {
                self.send_to(conn_id, &OutboundMessage::pong());
                None
            }
            Ok(message) => Some(message),
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "Unparseable frame");
                self.send_to(
                    conn_id,
                    &OutboundMessage::Error {
                        code: "INVALID_MESSAGE".to_string(),
                        message: format!("Failed to parse message: {e}"),
                    },
                );
                None
            }
        }
    }

    /// Send one frame to one connection.
    pub fn send_to(&self, conn_id: &ConnectionId, message: &OutboundMessage) -> bool {
        let Some(handle) = self.pool.get(conn_id) else {
            return false;
        };
        let frame = match serializer::serialize_outbound(message) {
            Ok(f) => f,
            Err(e) => {
                error!(error = %e, "Failed to serialize outbound message");
                return false;
            }
        };
        let sent = handle.send(frame);
        self.metrics.record_send(sent);
        sent
    }

    /// Send one frame to every member of a room. Returns deliveries queued.
    pub fn broadcast(&self, audience: Audience, message: &OutboundMessage) -> usize {
        let frame = match serializer::serialize_outbound(message) {
            Ok(f) => f,
            Err(e) => {
                error!(error = %e, "Failed to serialize broadcast message");
                return 0;
            }
        };

        let mut sent = 0;
        for conn_id in self.rooms.members(audience) {
            if let Some(handle) = self.pool.get(&conn_id) {
                let ok = handle.send(frame.clone());
                self.metrics.record_send(ok);
                if ok {
                    sent += 1;
                }
            }
        }
        debug!(audience = %audience, sent, "Broadcast delivered");
        sent
    }

    /// Close every connection.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.mark_closed();
            self.pool.remove(&conn.id);
            self.rooms.leave(conn.id);
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// The room a connection is in.
    pub fn audience_of(&self, conn_id: &ConnectionId) -> Option<Audience> {
        self.rooms.audience_of(*conn_id)
    }
}
