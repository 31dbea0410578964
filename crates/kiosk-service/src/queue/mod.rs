//! Queue lifecycle coordination.

pub mod outcome;
pub mod service;

pub use outcome::{JoinOutcome, JoinRequest};
pub use service::QueueService;
