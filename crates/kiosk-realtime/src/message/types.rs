//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};

use kiosk_engine::{QueueUpdate, WaitDetail};

/// Frames sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Ask to join the admin room.
    AdminConnect {
        /// Admin password.
        #[serde(default)]
        password: Option<String>,
    },
    /// Return to the public room.
    AdminLeave,
    /// Keepalive.
    Ping,
}

/// Frames sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Full queue listing for the receiving audience.
    QueueUpdate {
        /// Listing entries, public or admin shaped.
        queue: serde_json::Value,
        /// Informational scalar wait in minutes.
        wait_time: u32,
        /// Per-line and per-span estimates.
        wait_detail: WaitDetail,
    },
    /// Admin room joined.
    AdminStatus {
        /// Role granted.
        role: String,
    },
    /// Admin room refused.
    AdminError {
        /// Reason.
        error: String,
    },
    /// Keepalive reply.
    Pong {
        /// Server timestamp (ms since epoch).
        timestamp: i64,
    },
    /// Protocol error.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl OutboundMessage {
    /// Wrap a projection as a `queue_update` frame.
    pub fn queue_update<E: Serialize>(update: &QueueUpdate<E>) -> Result<Self, serde_json::Error> {
        Ok(Self::QueueUpdate {
            queue: serde_json::to_value(&update.queue)?,
            wait_time: update.wait_time,
            wait_detail: update.wait_detail.clone(),
        })
    }

    /// Keepalive reply stamped now.
    pub fn pong() -> Self {
        Self::Pong {
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Frame type name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::QueueUpdate { .. } => "queue_update",
            Self::AdminStatus { .. } => "admin_status",
            Self::AdminError { .. } => "admin_error",
            Self::Pong { .. } => "pong",
            Self::Error { .. } => "error",
        }
    }
}
