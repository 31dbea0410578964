//! Twilio SMS gateway.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use kiosk_core::config::TwilioConfig;
use kiosk_core::error::{AppError, ErrorKind};
use kiosk_core::result::AppResult;
use kiosk_entity::Contact;

use super::gateway::NotificationGateway;

/// Sends texts through the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioSmsGateway {
    config: TwilioConfig,
    client: reqwest::Client,
}

impl TwilioSmsGateway {
    /// Create a gateway with a request timeout.
    pub fn new(config: TwilioConfig, timeout_seconds: u64) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self { config, client })
    }

    /// Messages endpoint for the configured account.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl NotificationGateway for TwilioSmsGateway {
    async fn notify(&self, contact: &Contact, message: &str) -> AppResult<()> {
        let Some(to) = contact.sms_target() else {
            debug!("No phone number on contact, skipping SMS");
            return Ok(());
        };

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", message),
            ])
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "SMS request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "SMS provider rejected message");
            return Err(AppError::external_service(format!(
                "SMS provider returned {status}"
            )));
        }

        debug!(to = %to, "SMS sent");
        Ok(())
    }
}
