//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use kiosk_core::types::id::RegistrationId;
use kiosk_entity::Contact;
use kiosk_service::JoinRequest;

fn default_party_size() -> u32 {
    1
}

/// Join request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinQueueRequest {
    /// Display name. Emptiness is checked by the queue service.
    #[serde(default)]
    #[validate(length(max = 100, message = "Name is too long"))]
    pub name: String,
    /// Phone number for SMS updates.
    #[validate(length(max = 32, message = "Phone number is too long"))]
    pub phone_number: Option<String>,
    /// Email address.
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: Option<String>,
    /// Whether the party agreed to be emailed.
    #[serde(default)]
    pub email_consent: bool,
    /// Number of adjacent lines needed.
    #[serde(default = "default_party_size")]
    pub party_size: u32,
    /// Preferred line for a single party.
    pub line_number: Option<u32>,
}

impl From<JoinQueueRequest> for JoinRequest {
    fn from(body: JoinQueueRequest) -> Self {
        Self {
            name: body.name,
            contact: Contact::new(body.phone_number, body.email, body.email_consent),
            party_size: body.party_size,
            requested_line: body.line_number,
        }
    }
}

/// Self-service cancellation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancelRequest {
    /// Phone number or email given at join time.
    #[validate(length(min = 1, message = "Contact is required"))]
    pub contact: String,
}

/// Inbound SMS webhook form (Twilio field names).
#[derive(Debug, Clone, Deserialize)]
pub struct SmsWebhookForm {
    /// Message text.
    #[serde(rename = "Body", default)]
    pub body: String,
    /// Sender phone number.
    #[serde(rename = "From", default)]
    pub from: String,
}

impl SmsWebhookForm {
    /// Whether the sender asked to leave the queue.
    pub fn is_cancel(&self) -> bool {
        self.body.trim().eq_ignore_ascii_case("cancel")
    }
}

/// Body carrying only the admin password.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminRequest {
    /// Admin password; the `x-admin-password` header is accepted too.
    pub password: Option<String>,
}

/// Serve-next body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextRequest {
    /// Admin password.
    pub password: Option<String>,
    /// Line to serve.
    pub line_number: Option<u32>,
}

/// Remove-by-id body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveRequest {
    /// Admin password.
    pub password: Option<String>,
    /// Registration to remove.
    pub user_id: Option<RegistrationId>,
}
