//! Gateway that only logs.

use async_trait::async_trait;
use tracing::info;

use kiosk_core::result::AppResult;
use kiosk_entity::Contact;

use super::gateway::NotificationGateway;

/// Used when no SMS provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogGateway;

#[async_trait]
impl NotificationGateway for LogGateway {
    async fn notify(&self, contact: &Contact, message: &str) -> AppResult<()> {
        info!(
            to = contact.sms_target().unwrap_or("-"),
            body = %message,
            "SMS provider not configured, skipping"
        );
        Ok(())
    }
}
