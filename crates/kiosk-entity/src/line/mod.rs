//! Per-line status entities.

pub mod status;

pub use status::LineStatus;
