//! Public queue handlers.

use axum::Json;
use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::info;
use validator::Validate;

use kiosk_engine::{PublicEntry, QueueUpdate};

use crate::dto::request::{CancelRequest, JoinQueueRequest, SmsWebhookForm};
use crate::dto::response::{CancelResponse, JoinResponse};
use crate::error::ApiResult;
use crate::state::AppState;

const SMS_REMOVED_REPLY: &str = "You have been removed from the queue.";

/// GET /queue
pub async fn get_queue(State(state): State<AppState>) -> ApiResult<Json<QueueUpdate<PublicEntry>>> {
    Ok(Json(state.service.public_listing().await?))
}

/// POST /join
pub async fn join_queue(
    State(state): State<AppState>,
    Json(body): Json<JoinQueueRequest>,
) -> ApiResult<(StatusCode, Json<JoinResponse>)> {
    body.validate()?;

    let outcome = state.service.join(body.into()).await?;
    let registration = outcome.registration;

    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            message: "Successfully joined queue".to_string(),
            id: registration.id,
            place_in_queue: registration.depth,
            line_number: registration.line,
            wait_time: outcome.wait_minutes,
        }),
    ))
}

/// POST /cancel
pub async fn cancel(
    State(state): State<AppState>,
    Json(body): Json<CancelRequest>,
) -> ApiResult<Json<CancelResponse>> {
    body.validate()?;
    let cancelled = state.service.cancel_by_contact(body.contact.trim()).await?;
    Ok(Json(CancelResponse { cancelled }))
}

/// POST /sms
///
/// Inbound SMS webhook. Replying "cancel" removes the sender's registration
/// and answers with TwiML; anything else gets an empty 204.
pub async fn sms_webhook(
    State(state): State<AppState>,
    Form(form): Form<SmsWebhookForm>,
) -> ApiResult<Response> {
    if !form.is_cancel() || form.from.trim().is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    if !state.service.cancel_by_contact(form.from.trim()).await? {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    info!("Registration cancelled by SMS reply");
    Ok((
        [(header::CONTENT_TYPE, "application/xml")],
        twiml_message(SMS_REMOVED_REPLY),
    )
        .into_response())
}

fn twiml_message(text: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{text}</Message></Response>"
    )
}
