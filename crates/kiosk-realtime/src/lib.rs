//! # kiosk-realtime
//!
//! WebSocket plumbing for Kiosk Queue:
//!
//! - connection pool with bounded per-socket send buffers
//! - `public` and `admin` audience rooms
//! - typed inbound/outbound message frames
//! - the [`QueueBroadcaster`] seam used by the queue service

pub mod broadcaster;
pub mod channel;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod server;

pub use broadcaster::{NullBroadcaster, QueueBroadcaster};
pub use channel::{Audience, RoomRegistry};
pub use connection::manager::ConnectionManager;
pub use message::types::{InboundMessage, OutboundMessage};
pub use server::RealtimeEngine;
