//! JSON serialization for WebSocket frames.

use super::types::{InboundMessage, OutboundMessage};

/// Serialize an outbound frame.
pub fn serialize_outbound(msg: &OutboundMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// Parse an inbound frame.
pub fn deserialize_inbound(text: &str) -> Result<InboundMessage, serde_json::Error> {
    serde_json::from_str(text)
}
