//! Point-in-time queue state and the derived views.

use chrono::{DateTime, Utc};

use kiosk_entity::{LineStatus, Registration};

use crate::context::QueueContext;
use crate::occupancy::Occupancy;
use crate::projection::{self, AdminEntry, PublicEntry, QueueUpdate};
use crate::wait::{self, WaitDetail};

/// Registrations plus per-line timestamps as read in one go from the store.
#[derive(Debug, Clone, Default)]
pub struct QueueSnapshot {
    /// Every registration, ordered by (line, depth).
    pub registrations: Vec<Registration>,
    /// Last-admitted instant per line, dense over `0..line_count`.
    pub last_admitted: Vec<DateTime<Utc>>,
}

impl QueueSnapshot {
    /// Build a snapshot from store rows.
    pub fn new(registrations: Vec<Registration>, statuses: &[LineStatus], line_count: u32) -> Self {
        Self {
            registrations,
            last_admitted: LineStatus::dense(statuses, line_count),
        }
    }

    /// Occupancy grid for this snapshot.
    pub fn occupancy(&self, ctx: &QueueContext) -> Occupancy {
        Occupancy::from_registrations(&self.registrations, ctx.line_count)
    }

    /// Wait estimates as of `now`.
    pub fn wait_detail(&self, ctx: &QueueContext, now: DateTime<Utc>) -> WaitDetail {
        wait::estimate(ctx, &self.occupancy(ctx), &self.last_admitted, now)
    }

    /// Public payload.
    pub fn public_update(&self, detail: &WaitDetail) -> QueueUpdate<PublicEntry> {
        QueueUpdate {
            queue: projection::public_view(&self.registrations),
            wait_time: detail.best_single(),
            wait_detail: detail.clone(),
        }
    }

    /// Admin payload.
    pub fn admin_update(&self, detail: &WaitDetail) -> QueueUpdate<AdminEntry> {
        QueueUpdate {
            queue: projection::admin_view(&self.registrations),
            wait_time: detail.best_single(),
            wait_detail: detail.clone(),
        }
    }

    /// Number of waiting parties.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
