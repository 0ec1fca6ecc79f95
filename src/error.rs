//! Hook error types with HTTP status code mapping.
//!
//! [`HookError`] covers every fault the webhook can raise. Filter
//! rejections are not errors: they are reported as plain-text outcomes by
//! [`crate::service::WebhookOutcome`]. Anything that ends up here is a
//! failed request and is rendered as a structured JSON error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "message not found: channel C123 at 1700000000.000100"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status               |
/// |-----------|------------------|---------------------------|
/// | 1000–1999 | Inbound payload  | 400 Bad Request           |
/// | 2000–2999 | Chat platform    | 502 Bad Gateway           |
/// | 3000–3999 | Server / storage | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The request body could not be read as a webhook payload.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The original message could not be fetched from the chat platform.
    #[error("message not found: channel {channel} at {ts}")]
    MessageNotFound {
        /// Channel the reaction was added in.
        channel: String,
        /// Timestamp of the reacted message.
        ts: String,
    },

    /// The chat platform returned a message timestamp that is not a
    /// fixed-point seconds value.
    #[error("invalid message timestamp: {0}")]
    InvalidTimestamp(String),

    /// Sheet or property store failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HookError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedPayload(_) => 1001,
            Self::MessageNotFound { .. } => 2001,
            Self::InvalidTimestamp(_) => 2002,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::MessageNotFound { .. } | Self::InvalidTimestamp(_) => StatusCode::BAD_GATEWAY,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for HookError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

impl From<sqlx::Error> for HookError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl IntoResponse for HookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "webhook request failed");
        } else {
            tracing::warn!(code = self.error_code(), error = %self, "webhook request rejected");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_ranges() {
        assert_eq!(HookError::MalformedPayload("x".into()).error_code(), 1001);
        let missing = HookError::MessageNotFound {
            channel: "C1".into(),
            ts: "1.0".into(),
        };
        assert_eq!(missing.error_code(), 2001);
        assert_eq!(missing.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            HookError::Persistence("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn json_errors_map_to_malformed_payload() {
        let Err(err) = serde_json::from_str::<serde_json::Value>("{not json") else {
            panic!("expected parse failure");
        };
        let hook_err = HookError::from(err);
        assert_eq!(hook_err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn into_response_uses_status_code() {
        let response = HookError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
