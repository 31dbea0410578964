//! Immutable queue parameters shared by every engine call.

use serde::{Deserialize, Serialize};

use kiosk_core::config::QueueConfig;

/// Fixed queue geometry and timing, built once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueContext {
    /// Number of parallel lines.
    pub line_count: u32,
    /// Minutes a party occupies the front of a line.
    pub slot_time_minutes: u32,
    /// Minutes needed to turn a line over between parties.
    pub reset_time_minutes: u32,
    /// Maximum depths probed by a single search.
    pub search_cap: u32,
    /// Extra depths probed past a span's deepest occupant when estimating.
    pub span_margin: u32,
}

impl QueueContext {
    /// Create a context with default timing for `line_count` lines.
    pub fn new(line_count: u32) -> Self {
        Self::from_config(&QueueConfig {
            line_count,
            ..QueueConfig::default()
        })
    }

    /// Build the context from the `[queue]` configuration section.
    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            line_count: config.line_count,
            slot_time_minutes: config.slot_time_minutes,
            reset_time_minutes: config.reset_time_minutes,
            search_cap: config.search_cap,
            span_margin: config.span_margin,
        }
    }

    /// Seconds one depth step adds to a line's projected readiness.
    pub fn span_total_seconds(&self) -> i64 {
        (i64::from(self.slot_time_minutes) + i64::from(self.reset_time_minutes)) * 60
    }

    /// Returns `true` if `line` is a valid line index.
    pub fn contains_line(&self, line: u32) -> bool {
        line < self.line_count
    }
}

impl Default for QueueContext {
    fn default() -> Self {
        Self::from_config(&QueueConfig::default())
    }
}
