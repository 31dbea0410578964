//! Line geometry and timing configuration.

use serde::{Deserialize, Serialize};

/// Queue engine configuration, fixed for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Number of parallel physical lines.
    #[serde(default = "default_line_count")]
    pub line_count: u32,
    /// Minutes one party occupies the front of a line.
    #[serde(default = "default_slot_time")]
    pub slot_time_minutes: u32,
    /// Minutes needed to reset a line between parties.
    #[serde(default = "default_reset_time")]
    pub reset_time_minutes: u32,
    /// Upper bound on depth-search iterations.
    #[serde(default = "default_search_cap")]
    pub search_cap: u32,
    /// Extra depths searched past the deepest occupied cell when estimating span waits.
    #[serde(default = "default_span_margin")]
    pub span_margin: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            line_count: default_line_count(),
            slot_time_minutes: default_slot_time(),
            reset_time_minutes: default_reset_time(),
            search_cap: default_search_cap(),
            span_margin: default_span_margin(),
        }
    }
}

fn default_line_count() -> u32 {
    3
}

fn default_slot_time() -> u32 {
    5
}

fn default_reset_time() -> u32 {
    1
}

fn default_search_cap() -> u32 {
    10_000
}

fn default_span_margin() -> u32 {
    4
}
