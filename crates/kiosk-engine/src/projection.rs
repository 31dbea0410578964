//! Role-specific views of the queue.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use kiosk_core::types::id::RegistrationId;
use kiosk_entity::Registration;

use crate::wait::WaitDetail;

/// What the public display sees. Only the party at the head of each line
/// is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicEntry {
    /// Registration id.
    pub id: RegistrationId,
    /// Lines spanned.
    pub party_size: u32,
    /// Depth within the span.
    #[serde(rename = "place_in_queue")]
    pub depth: u32,
    /// First spanned line.
    #[serde(rename = "line_number")]
    pub line: u32,
    /// Display name, head of line only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// What an authenticated operator sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminEntry {
    /// Registration id.
    pub id: RegistrationId,
    /// Display name.
    pub name: String,
    /// Phone number, if given.
    pub phone_number: Option<String>,
    /// Email, if given.
    pub email: Option<String>,
    /// Email contact consent.
    pub email_consent: bool,
    /// Lines spanned.
    pub party_size: u32,
    /// Depth within the span.
    #[serde(rename = "place_in_queue")]
    pub depth: u32,
    /// First spanned line.
    #[serde(rename = "line_number")]
    pub line: u32,
}

/// Payload pushed to clients after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueUpdate<E> {
    /// Listing ordered by (line, depth).
    pub queue: Vec<E>,
    /// Informational scalar wait in minutes.
    pub wait_time: u32,
    /// Full per-line and per-span estimates.
    pub wait_detail: WaitDetail,
}

fn ordered(registrations: &[Registration]) -> Vec<&Registration> {
    let mut sorted: Vec<&Registration> = registrations.iter().collect();
    sorted.sort_by_key(|r| (r.line, r.depth));
    sorted
}

/// Redacted listing: the first entry seen for each start line keeps its name.
pub fn public_view(registrations: &[Registration]) -> Vec<PublicEntry> {
    let mut named_lines = HashSet::new();
    ordered(registrations)
        .into_iter()
        .map(|r| PublicEntry {
            id: r.id,
            party_size: r.party_size,
            depth: r.depth,
            line: r.line,
            name: named_lines.insert(r.line).then(|| r.name.clone()),
        })
        .collect()
}

/// Full listing with identity and contact details.
pub fn admin_view(registrations: &[Registration]) -> Vec<AdminEntry> {
    ordered(registrations)
        .into_iter()
        .map(|r| AdminEntry {
            id: r.id,
            name: r.name.clone(),
            phone_number: r.contact.phone_number.clone(),
            email: r.contact.email.clone(),
            email_consent: r.contact.email_consent,
            party_size: r.party_size,
            depth: r.depth,
            line: r.line,
        })
        .collect()
}
