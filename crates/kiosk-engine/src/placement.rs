//! Placement of an arriving party onto the line grid.
//!
//! A party of size 1 takes the shallowest free cell on its requested line,
//! or on whichever line has the shallowest free cell. A larger party needs
//! the same depth free on every line of a contiguous span, and takes the
//! span where that shared depth is smallest. Ties go to the lowest line.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::QueueContext;
use crate::occupancy::Occupancy;
use crate::search::DepthSearch;

/// The cell a party was assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// First line of the span.
    pub line: u32,
    /// Depth shared by every spanned line.
    pub depth: u32,
}

/// Why a party could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Party size was zero.
    #[error("Party size must be at least 1")]
    EmptyParty,
    /// The party is wider than the whole queue.
    #[error("Party size {party_size} exceeds the {line_count} available lines")]
    PartyTooLarge {
        /// Requested width.
        party_size: u32,
        /// Configured line count.
        line_count: u32,
    },
    /// The requested line does not exist.
    #[error("Line {line} is out of range (0..{line_count})")]
    LineOutOfRange {
        /// Requested line.
        line: u32,
        /// Configured line count.
        line_count: u32,
    },
    /// Every candidate hit the depth-search cap.
    #[error("Depth search exhausted after {cap} probes for party size {party_size}")]
    SearchExhausted {
        /// Requested width.
        party_size: u32,
        /// Probe bound in force.
        cap: u32,
    },
}

impl PlacementError {
    /// Returns `true` if the request itself was malformed.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::SearchExhausted { .. })
    }
}

/// Choose the cell for a party of `party_size`.
///
/// `requested_line` is honoured for single parties; for wider parties it is
/// range-checked and otherwise ignored.
pub fn place(
    ctx: &QueueContext,
    occupancy: &Occupancy,
    party_size: u32,
    requested_line: Option<u32>,
) -> Result<Placement, PlacementError> {
    if party_size == 0 {
        return Err(PlacementError::EmptyParty);
    }
    if party_size > ctx.line_count {
        return Err(PlacementError::PartyTooLarge {
            party_size,
            line_count: ctx.line_count,
        });
    }
    if let Some(line) = requested_line
        && !ctx.contains_line(line)
    {
        return Err(PlacementError::LineOutOfRange {
            line,
            line_count: ctx.line_count,
        });
    }

    let exhausted = PlacementError::SearchExhausted {
        party_size,
        cap: ctx.search_cap,
    };

    if party_size == 1
        && let Some(line) = requested_line
    {
        return match occupancy.earliest_free_depth(line, ctx.search_cap) {
            DepthSearch::Found(depth) => Ok(Placement { line, depth }),
            DepthSearch::Exhausted => Err(exhausted),
        };
    }

    best_span(ctx, occupancy, party_size).ok_or(exhausted)
}

/// Shallowest span of `width` lines, lowest start on ties.
fn best_span(ctx: &QueueContext, occupancy: &Occupancy, width: u32) -> Option<Placement> {
    let mut best: Option<Placement> = None;
    for start in 0..=(ctx.line_count - width) {
        let Some(depth) = occupancy
            .earliest_common_free_depth(start, width, ctx.search_cap)
            .found()
        else {
            continue;
        };
        if best.is_none_or(|b| depth < b.depth) {
            best = Some(Placement { line: start, depth });
        }
    }
    best
}
