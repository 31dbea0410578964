//! Response DTOs.

use serde::{Deserialize, Serialize};

use kiosk_core::types::id::RegistrationId;

/// Plain message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    /// Confirmation text.
    pub message: String,
    /// Registration id, needed to cancel later.
    pub id: RegistrationId,
    /// Assigned depth.
    pub place_in_queue: u32,
    /// Assigned start line.
    pub line_number: u32,
    /// Estimated wait for the assigned cell, in minutes.
    pub wait_time: u32,
}

/// Cancellation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// Whether a registration matched and was removed.
    pub cancelled: bool,
}

/// Serve-next result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextResponse {
    /// Confirmation text.
    pub message: String,
    /// Registration served, if the line was not empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub served: Option<RegistrationId>,
}

/// Health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the state was built.
    pub uptime_seconds: i64,
    /// Store reachability.
    pub store: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
}
