//! Audience rooms.

pub mod registry;
pub mod room;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use registry::RoomRegistry;
pub use room::Room;

/// Who a broadcast is for. Every connection sits in exactly one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Redacted view for kiosks and displays.
    Public,
    /// Full view for authenticated operators.
    Admin,
}

impl Audience {
    /// Room name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
