//! Queue-level summary entities.

pub mod summary;

pub use summary::QueueSummary;
