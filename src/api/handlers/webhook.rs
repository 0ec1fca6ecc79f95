//! Slack Events API webhook.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;

use crate::app_state::AppState;
use crate::domain::InboundEvent;
use crate::error::{ErrorResponse, HookError};

/// `POST /slack/events` — Receive a Slack event delivery.
///
/// The body is read raw and parsed here rather than through the `Json`
/// extractor: Slack does not always send `application/json`, and parse
/// failures must surface as [`HookError::MalformedPayload`].
///
/// # Errors
///
/// Returns [`HookError`] for malformed payloads, unresolvable messages
/// and store failures. Filter rejections are successful responses.
#[utoipa::path(
    post,
    path = "/slack/events",
    tag = "Webhook",
    summary = "Slack event delivery",
    description = "Answers the URL verification handshake and records attendance for the configured reaction. Every application outcome is HTTP 200 with a plain-text body such as `OK`, `Already recorded` or `Not target channel`.",
    request_body = InboundEvent,
    responses(
        (status = 200, description = "Outcome text, or the challenge verbatim", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed payload", body = ErrorResponse),
        (status = 502, description = "Original message could not be resolved", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn slack_events(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, HookError> {
    state.attendance_service.handle_body(&body).await
}

/// Webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/slack/events", post(slack_events))
}
