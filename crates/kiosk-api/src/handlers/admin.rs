//! Admin handlers. Every handler checks the admin password first.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

use kiosk_core::error::AppError;
use kiosk_engine::{AdminEntry, QueueUpdate};

use crate::dto::request::{AdminRequest, NextRequest, RemoveRequest};
use crate::dto::response::{MessageResponse, NextResponse};
use crate::error::ApiResult;
use crate::middleware::admin::authorize;
use crate::state::AppState;

/// POST /admin/check_password
pub async fn check_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AdminRequest>,
) -> ApiResult<Json<MessageResponse>> {
    authorize(&state.config.admin, &headers, body.password.as_deref())?;
    Ok(Json(MessageResponse::new("Password is correct")))
}

/// POST /admin/queue
pub async fn admin_queue(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AdminRequest>,
) -> ApiResult<Json<QueueUpdate<AdminEntry>>> {
    authorize(&state.config.admin, &headers, body.password.as_deref())?;
    Ok(Json(state.service.admin_listing().await?))
}

/// POST /admin/next
pub async fn next_in_queue(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NextRequest>,
) -> ApiResult<Json<NextResponse>> {
    authorize(&state.config.admin, &headers, body.password.as_deref())?;

    let line = body
        .line_number
        .ok_or_else(|| AppError::validation("Line number is required"))?;
    let served = state.service.serve_next(line).await?;

    Ok(Json(NextResponse {
        message: format!("Line {line} advanced"),
        served: served.map(|r| r.id),
    }))
}

/// POST /admin/remove
pub async fn remove_from_queue(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RemoveRequest>,
) -> ApiResult<Json<MessageResponse>> {
    authorize(&state.config.admin, &headers, body.password.as_deref())?;

    let id = body
        .user_id
        .ok_or_else(|| AppError::validation("User id is required"))?;
    state.service.remove(id).await?;

    Ok(Json(MessageResponse::new("User removed")))
}
