//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use crate::api::handlers::{system, webhook};
use crate::domain::inbound_event::{CallbackEvent, InboundEvent, PayloadType};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "attendance-hook",
        description = "Records office attendance from Slack reactions."
    ),
    paths(webhook::slack_events, system::health_handler),
    components(schemas(
        InboundEvent,
        PayloadType,
        CallbackEvent,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    tags(
        (name = "Webhook", description = "Slack Events API receiver"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
