//! # kiosk-engine
//!
//! The allocation core of Kiosk Queue. Everything here is synchronous and
//! side-effect free: callers hand in a snapshot of registrations and line
//! timestamps, and get back placements, depth moves, wait estimates and
//! redacted projections.

pub mod compaction;
pub mod context;
pub mod occupancy;
pub mod placement;
pub mod projection;
pub mod search;
pub mod snapshot;
pub mod wait;

pub use compaction::{CompactionPlan, DepthMove, compact};
pub use context::QueueContext;
pub use occupancy::Occupancy;
pub use placement::{Placement, PlacementError, place};
pub use projection::{AdminEntry, PublicEntry, QueueUpdate};
pub use search::DepthSearch;
pub use snapshot::QueueSnapshot;
pub use wait::WaitDetail;
