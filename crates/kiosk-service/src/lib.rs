//! # kiosk-service
//!
//! Application services for Kiosk Queue. [`QueueService`] serializes every
//! mutation behind one writer lock, drives the engine, commits through the
//! registration store, then republishes the queue and notifies the affected
//! party.
//!
//! Services follow constructor injection: every collaborator is handed in
//! as an `Arc` at construction time.

pub mod notification;
pub mod queue;

pub use notification::{LogGateway, NotificationGateway, TwilioSmsGateway};
pub use queue::{JoinOutcome, JoinRequest, QueueService};
