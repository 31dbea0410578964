//! Realtime engine counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Connection and frame counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_total: AtomicU64,
    connections_active: AtomicU64,
    messages_sent: AtomicU64,
    messages_dropped: AtomicU64,
    messages_received: AtomicU64,
}

impl RealtimeMetrics {
    /// Zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A socket was accepted.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// A socket went away.
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// A frame was queued (`true`) or dropped (`false`).
    pub fn record_send(&self, delivered: bool) {
        if delivered {
            self.messages_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.messages_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A frame arrived.
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
        }
    }
}

/// Serializable counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Sockets accepted since start.
    pub connections_total: u64,
    /// Sockets currently open.
    pub connections_active: u64,
    /// Frames queued for delivery.
    pub messages_sent: u64,
    /// Frames dropped on full or closed buffers.
    pub messages_dropped: u64,
    /// Frames received.
    pub messages_received: u64,
}
