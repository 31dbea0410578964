//! Registration entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use kiosk_core::types::id::RegistrationId;

use super::contact::Contact;

/// A party waiting in one or more adjacent lines.
///
/// `line` and `party_size` are fixed at creation; only compaction
/// changes `depth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Registration {
    /// Unique registration identifier.
    pub id: RegistrationId,
    /// Display name shown at the head of the line.
    pub name: String,
    /// Contact details.
    #[sqlx(flatten)]
    pub contact: Contact,
    /// Number of adjacent lines the party occupies.
    #[sqlx(try_from = "i32")]
    pub party_size: u32,
    /// Zero-based first line of the span.
    #[sqlx(rename = "line_number", try_from = "i32")]
    pub line: u32,
    /// Position within the spanned lines; 1 is served next.
    #[sqlx(rename = "place_in_queue", try_from = "i32")]
    pub depth: u32,
    /// When the party joined.
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Returns `true` if the span includes `line`.
    pub fn covers(&self, line: u32) -> bool {
        self.line <= line && line < self.line + self.party_size
    }

    /// Lines spanned, clipped to `line_count`.
    pub fn spanned_lines(&self, line_count: u32) -> std::ops::Range<u32> {
        let end = (self.line + self.party_size).min(line_count);
        self.line.min(end)..end
    }
}

/// Input for creating a registration once a cell has been chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    /// Display name.
    pub name: String,
    /// Contact details.
    pub contact: Contact,
    /// Number of lines spanned.
    pub party_size: u32,
    /// Start line picked by placement.
    pub line: u32,
    /// Depth picked by placement.
    pub depth: u32,
}

impl NewRegistration {
    /// Materialize the registration with a fresh id and timestamp.
    pub fn into_registration(self) -> Registration {
        Registration {
            id: RegistrationId::new(),
            name: self.name,
            contact: self.contact,
            party_size: self.party_size,
            line: self.line,
            depth: self.depth,
            created_at: Utc::now(),
        }
    }
}
