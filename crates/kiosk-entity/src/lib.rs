//! # kiosk-entity
//!
//! Domain entity models for Kiosk Queue. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities additionally derive `sqlx::FromRow`.

pub mod line;
pub mod queue;
pub mod registration;

pub use line::LineStatus;
pub use queue::QueueSummary;
pub use registration::{Contact, NewRegistration, Registration};
