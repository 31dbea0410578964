//! Outbound notification configuration.

use serde::{Deserialize, Serialize};

/// Notification gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Gateway provider: `"log"` or `"twilio"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Request timeout for the provider API in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Twilio credentials.
    #[serde(default)]
    pub twilio: TwilioConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            timeout_seconds: default_timeout(),
            twilio: TwilioConfig::default(),
        }
    }
}

/// Twilio SMS credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    /// Account SID.
    #[serde(default)]
    pub account_sid: String,
    /// Auth token.
    #[serde(default)]
    pub auth_token: String,
    /// Sender phone number.
    #[serde(default)]
    pub from_number: String,
    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            api_base: default_api_base(),
        }
    }
}

impl TwilioConfig {
    /// Returns `true` if credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty()
    }
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"****")
            .field("from_number", &self.from_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_api_base() -> String {
    "https://api.twilio.com".to_string()
}
