//! WebSocket message frames.

pub mod serializer;
pub mod types;

pub use types::{InboundMessage, OutboundMessage};
