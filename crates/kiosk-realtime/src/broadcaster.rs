//! Publishing seam between the queue service and connected clients.

use async_trait::async_trait;

use crate::channel::Audience;
use crate::message::types::OutboundMessage;

/// Pushes frames to an audience. Delivery is best effort.
#[async_trait]
pub trait QueueBroadcaster: Send + Sync + std::fmt::Debug {
    /// Send `message` to everyone in `audience`. Returns deliveries queued.
    async fn publish(&self, audience: Audience, message: OutboundMessage) -> usize;
}

/// Broadcaster with no listeners, for the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBroadcaster;

#[async_trait]
impl QueueBroadcaster for NullBroadcaster {
    async fn publish(&self, _audience: Audience, _message: OutboundMessage) -> usize {
        0
    }
}
