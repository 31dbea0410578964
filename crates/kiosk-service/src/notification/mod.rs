//! Participant notifications.

pub mod formatter;
pub mod gateway;
pub mod log;
pub mod sms;

pub use gateway::{NotificationGateway, build_gateway};
pub use log::LogGateway;
pub use sms::TwilioSmsGateway;
