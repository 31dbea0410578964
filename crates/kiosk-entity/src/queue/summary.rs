//! Legacy aggregate wait time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Informational scalar wait time. Placement never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QueueSummary {
    /// Best single-party wait in minutes at the last mutation.
    #[sqlx(try_from = "i32")]
    pub wait_time: u32,
    /// When the value was recomputed.
    pub updated_at: DateTime<Utc>,
}

impl Default for QueueSummary {
    fn default() -> Self {
        Self {
            wait_time: 0,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}
