//! Application builder: wires router, middleware and state into an Axum app.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use kiosk_core::config::AppConfig;
use kiosk_core::error::AppError;
use kiosk_core::result::AppResult;
use kiosk_engine::QueueContext;
use kiosk_realtime::{QueueBroadcaster, RealtimeEngine};
use kiosk_service::QueueService;
use kiosk_service::notification::build_gateway;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Constructs the store, realtime engine, notifier and queue service.
///
/// `migrate` applies pending migrations when the store is PostgreSQL.
pub async fn build_state(config: AppConfig, migrate: bool) -> AppResult<AppState> {
    info!(
        storage = ?config.database.storage,
        line_count = config.queue.line_count,
        "Initializing queue state"
    );

    let store = kiosk_database::open_store(&config.database, migrate).await?;
    let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
    let notifier = build_gateway(&config.notification)?;

    let service = Arc::new(QueueService::new(
        QueueContext::from_config(&config.queue),
        store,
        Arc::clone(&realtime) as Arc<dyn QueueBroadcaster>,
        notifier,
    ));

    Ok(AppState::new(config, service, realtime))
}

/// Runs the Kiosk Queue server until Ctrl+C.
pub async fn run_server(config: AppConfig, migrate: bool) -> Result<(), AppError> {
    info!("Starting Kiosk Queue server...");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = build_state(config, migrate).await?;
    let realtime = Arc::clone(&state.realtime);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Kiosk Queue server listening on {}", addr);

    let stopping = Arc::new(Notify::new());
    let signal = Arc::clone(&stopping);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            realtime.shutdown();
            signal.notify_one();
        })
        .into_future();

    let deadline = async {
        stopping.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        () = deadline => {
            warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out, exiting");
        }
    }

    info!("Kiosk Queue server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
