//! Top-level realtime engine.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use kiosk_core::config::RealtimeConfig;

use crate::broadcaster::QueueBroadcaster;
use crate::channel::{Audience, RoomRegistry};
use crate::connection::manager::ConnectionManager;
use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;

/// Ties the connection manager, rooms and metrics together.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Audience rooms.
    pub rooms: Arc<RoomRegistry>,
    /// Counters.
    pub metrics: Arc<RealtimeMetrics>,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Build the engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let metrics = Arc::new(RealtimeMetrics::new());
        let rooms = Arc::new(RoomRegistry::new());
        let connections = Arc::new(ConnectionManager::new(
            config,
            rooms.clone(),
            metrics.clone(),
        ));

        info!("Realtime engine initialized");

        Self {
            connections,
            rooms,
            metrics,
            shutdown_tx,
        }
    }

    /// Receiver fired once on shutdown; socket tasks select on it.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal every socket task and drop all connections.
    pub fn shutdown(&self) {
        info!("Shutting down realtime engine");
        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
    }
}

#[async_trait]
impl QueueBroadcaster for RealtimeEngine {
    async fn publish(&self, audience: Audience, message: OutboundMessage) -> usize {
        self.connections.broadcast(audience, &message)
    }
}
