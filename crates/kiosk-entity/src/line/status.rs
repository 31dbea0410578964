//! Line status entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// When the front of a line last admitted a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LineStatus {
    /// Zero-based line index.
    #[sqlx(try_from = "i32")]
    pub line_number: u32,
    /// Instant the last depth-1 party on this line was served.
    pub last_admitted_time: DateTime<Utc>,
}

impl LineStatus {
    /// Expand sparse rows into one timestamp per line, defaulting to the epoch.
    pub fn dense(rows: &[LineStatus], line_count: u32) -> Vec<DateTime<Utc>> {
        let mut out = vec![DateTime::<Utc>::UNIX_EPOCH; line_count as usize];
        for row in rows {
            if let Some(slot) = out.get_mut(row.line_number as usize) {
                *slot = row.last_admitted_time;
            }
        }
        out
    }
}
