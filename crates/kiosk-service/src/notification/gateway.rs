//! Notification gateway trait and provider selection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use kiosk_core::config::NotificationConfig;
use kiosk_core::result::AppResult;
use kiosk_entity::Contact;

use super::log::LogGateway;
use super::sms::TwilioSmsGateway;

/// Delivers a text to a party. Failures are reported but never undo a
/// queue change.
#[async_trait]
pub trait NotificationGateway: Send + Sync + std::fmt::Debug {
    /// Send `message` to `contact`.
    async fn notify(&self, contact: &Contact, message: &str) -> AppResult<()>;
}

/// Build the gateway named by `notification.provider`.
///
/// Falls back to logging when Twilio is selected without credentials.
pub fn build_gateway(config: &NotificationConfig) -> AppResult<Arc<dyn NotificationGateway>> {
    match config.provider.as_str() {
        "twilio" if config.twilio.is_configured() => {
            info!("Using Twilio SMS gateway");
            Ok(Arc::new(TwilioSmsGateway::new(
                config.twilio.clone(),
                config.timeout_seconds,
            )?))
        }
        "twilio" => {
            warn!("Twilio selected but credentials are missing, notifications will only be logged");
            Ok(Arc::new(LogGateway))
        }
        "log" => Ok(Arc::new(LogGateway)),
        other => {
            warn!(provider = %other, "Unknown notification provider, notifications will only be logged");
            Ok(Arc::new(LogGateway))
        }
    }
}
