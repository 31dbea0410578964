//! Route definitions for the Kiosk Queue HTTP API.
//!
//! Queue routes are mounted under `server.url_prefix`. The router receives
//! `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(public_routes())
        .merge(admin_routes())
        .merge(health_routes())
        .route("/ws", get(handlers::ws::ws_upgrade));

    let prefix = normalize_prefix(&state.config.server.url_prefix);
    let cors = build_cors_layer(&state.config.server.cors);

    let router = if prefix.is_empty() {
        Router::new().merge(api_routes)
    } else {
        Router::new().nest(&prefix, api_routes)
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Kiosk endpoints: listing, join, self-service cancel, SMS webhook
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/queue", get(handlers::queue::get_queue))
        .route("/join", post(handlers::queue::join_queue))
        .route("/cancel", post(handlers::queue::cancel))
        .route("/sms", post(handlers::queue::sms_webhook))
}

/// Operator endpoints, password-guarded in each handler
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/check_password", post(handlers::admin::check_password))
        .route("/admin/queue", post(handlers::admin::admin_queue))
        .route("/admin/next", post(handlers::admin::next_in_queue))
        .route("/admin/remove", post(handlers::admin::remove_from_queue))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// `""` and `"/"` mount at the root; otherwise a leading slash is ensured
/// and a trailing one dropped.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
