//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use tracing::warn;

use kiosk_core::types::id::ConnectionId;

/// Outbound side of one WebSocket.
///
/// Frames are pushed onto a bounded channel drained by the socket's
/// writer task; a full buffer drops the frame instead of blocking.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection id.
    pub id: ConnectionId,
    /// Serialized frames for the writer task.
    pub sender: mpsc::Sender<String>,
    /// When the socket was accepted.
    pub connected_at: DateTime<Utc>,
    /// Last inbound frame.
    pub last_activity: RwLock<DateTime<Utc>>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Wrap a sender in a new handle.
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ConnectionId::new(),
            sender,
            connected_at: now,
            last_activity: RwLock::new(now),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue a frame without waiting. Returns `false` if it was dropped.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Returns `true` until the socket is closed.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection closed.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Record inbound activity.
    pub async fn touch(&self) {
        *self.last_activity.write().await = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_buffer_drops() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(tx);
        assert!(handle.send("a".to_string()));
        assert!(!handle.send("b".to_string()));
        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert!(handle.is_alive());
    }

    #[tokio::test]
    async fn test_closed_receiver_marks_dead() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = ConnectionHandle::new(tx);
        assert!(!handle.send("a".to_string()));
        assert!(!handle.is_alive());
    }
}
