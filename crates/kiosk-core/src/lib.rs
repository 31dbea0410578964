//! # kiosk-core
//!
//! Core crate for Kiosk Queue. Contains the configuration schemas,
//! typed identifiers and the unified error system.
//!
//! This crate has **no** internal dependencies on other Kiosk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
