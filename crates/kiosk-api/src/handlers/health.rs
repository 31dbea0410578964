//! Health check handler.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = match state.service.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if store_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
        store: if store_ok { "connected" } else { "unavailable" }.to_string(),
        ws_connections: state.realtime.connections.connection_count(),
    })
}
