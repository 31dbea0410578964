//! Wait-time estimation from last-admitted timestamps.
//!
//! Each depth step on a line adds one slot plus one reset to the instant
//! that line last admitted a party. A spanning party waits for the slowest
//! of its lines.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::QueueContext;
use crate::occupancy::Occupancy;

/// Per-line and per-span wait estimates, in whole minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitDetail {
    /// Wait for a single party joining each line, indexed by line.
    pub per_line_single: Vec<u32>,
    /// Best wait for a party of each width from 2 upward. Widths with no
    /// placeable start are absent.
    pub per_span: BTreeMap<u32, u32>,
}

impl WaitDetail {
    /// The best single-party wait, 0 for a queue with no lines.
    pub fn best_single(&self) -> u32 {
        self.per_line_single.iter().copied().min().unwrap_or(0)
    }

    /// Wait a party of `party_size` would see right now.
    pub fn for_party(&self, party_size: u32) -> Option<u32> {
        match party_size {
            0 => None,
            1 => self.per_line_single.iter().copied().min(),
            n => self.per_span.get(&n).copied(),
        }
    }
}

/// Instant line `line` becomes ready for a party at `depth`.
pub fn projected_ready(
    ctx: &QueueContext,
    last_admitted: &[DateTime<Utc>],
    line: u32,
    depth: u32,
) -> DateTime<Utc> {
    let base = last_admitted
        .get(line as usize)
        .copied()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    base + chrono::Duration::seconds(i64::from(depth) * ctx.span_total_seconds())
}

/// Whole minutes from `now` until `ready`, floored at 0.
pub fn minutes_until(ready: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let seconds = (ready - now).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    u32::try_from(seconds / 60).unwrap_or(u32::MAX)
}

/// Wait for a party already placed at `(line, depth)` spanning `party_size` lines.
pub fn eta_for_cell(
    ctx: &QueueContext,
    last_admitted: &[DateTime<Utc>],
    line: u32,
    party_size: u32,
    depth: u32,
    now: DateTime<Utc>,
) -> u32 {
    let end = line.saturating_add(party_size).min(ctx.line_count);
    (line..end)
        .map(|l| projected_ready(ctx, last_admitted, l, depth))
        .max()
        .map_or(0, |ready| minutes_until(ready, now))
}

/// Recompute every estimate for the current occupancy.
pub fn estimate(
    ctx: &QueueContext,
    occupancy: &Occupancy,
    last_admitted: &[DateTime<Utc>],
    now: DateTime<Utc>,
) -> WaitDetail {
    let per_line_single = (0..ctx.line_count)
        .map(|line| {
            let depth = occupancy
                .earliest_free_depth(line, ctx.search_cap)
                .found()
                .unwrap_or_else(|| ctx.search_cap.saturating_add(1));
            minutes_until(projected_ready(ctx, last_admitted, line, depth), now)
        })
        .collect();

    let mut per_span = BTreeMap::new();
    for width in 2..=ctx.line_count {
        let best = (0..=(ctx.line_count - width))
            .filter_map(|start| {
                let cap = occupancy
                    .max_depth_across(start, width)
                    .saturating_add(ctx.span_margin)
                    .min(ctx.search_cap);
                let depth = occupancy
                    .earliest_common_free_depth(start, width, cap)
                    .found()?;
                (start..start + width)
                    .map(|line| projected_ready(ctx, last_admitted, line, depth))
                    .max()
            })
            .min();
        if let Some(ready) = best {
            per_span.insert(width, minutes_until(ready, now));
        }
    }

    WaitDetail {
        per_line_single,
        per_span,
    }
}
