//! # kiosk-api
//!
//! HTTP API layer for Kiosk Queue built on Axum.
//!
//! Provides the public and admin REST endpoints, the SMS webhook, the
//! WebSocket upgrade, middleware (admin guard, CORS, logging), DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
