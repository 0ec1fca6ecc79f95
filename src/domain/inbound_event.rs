//! Slack Events API payloads accepted by the webhook.
//!
//! Only the fields the recorder reads are modelled. Everything inside
//! `event` apart from its type is kept as raw JSON so that unrelated event
//! types still deserialize and can be rejected by the filter instead of
//! failing the request.

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Event type string of a reaction being added to a message.
pub const REACTION_ADDED: &str = "reaction_added";

/// Outer envelope type of a webhook delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PayloadType {
    /// Endpoint ownership handshake sent when the webhook URL is registered.
    UrlVerification,
    /// A subscribed event wrapped in a callback envelope.
    EventCallback,
    /// Any other or missing envelope type (e.g. `app_rate_limited`).
    #[default]
    #[serde(other)]
    Other,
}

/// Webhook body as delivered by the chat platform.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InboundEvent {
    /// Envelope type.
    #[serde(rename = "type", default)]
    pub kind: PayloadType,
    /// Handshake token, only present on `url_verification`.
    #[serde(default)]
    pub challenge: Option<String>,
    /// Unique delivery id of the wrapped event.
    #[serde(default)]
    pub event_id: Option<String>,
    /// The wrapped event.
    #[serde(default)]
    pub event: Option<CallbackEvent>,
}

/// Inner event of an `event_callback` envelope.
///
/// Only `type` is typed up front. The other fields keep their raw JSON
/// shape, since their meaning depends on the event type (`user` is an
/// object on `user_change`, for instance), and are read once the event
/// is known to be a `reaction_added`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CallbackEvent {
    /// Event type, e.g. `"reaction_added"`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Reaction name without colons, e.g. `"syussya"`.
    #[serde(default)]
    pub reaction: Option<Value>,
    /// User who added the reaction.
    #[serde(default)]
    pub user: Option<Value>,
    /// Item the reaction was added to: `{"channel": .., "ts": ..}`.
    #[serde(default)]
    pub item: Option<Value>,
}

/// A reaction event that passed the type and reaction filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReaction {
    /// User who reacted.
    pub user_id: String,
    /// Channel of the reacted message.
    pub channel_id: String,
    /// Timestamp of the reacted message.
    pub message_ts: String,
}

impl InboundEvent {
    /// Parses a raw request body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the body is not a JSON object
    /// of the expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

impl CallbackEvent {
    /// Returns `true` for `reaction_added` events.
    #[must_use]
    pub fn is_reaction_added(&self) -> bool {
        self.kind == REACTION_ADDED
    }

    /// Returns `true` when the reaction name equals `target`.
    #[must_use]
    pub fn has_reaction(&self, target: &str) -> bool {
        self.reaction.as_ref().and_then(Value::as_str) == Some(target)
    }

    /// Extracts the fields needed to record attendance.
    ///
    /// Returns `None` if the user, channel or message timestamp is missing
    /// or not a string.
    #[must_use]
    pub fn target_reaction(&self) -> Option<TargetReaction> {
        let item = self.item.as_ref()?;
        let text = |value: Option<&Value>| value.and_then(Value::as_str).map(str::to_string);
        Some(TargetReaction {
            user_id: text(self.user.as_ref())?,
            channel_id: text(item.get("channel"))?,
            message_ts: text(item.get("ts"))?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> InboundEvent {
        let Ok(event) = InboundEvent::from_slice(json.as_bytes()) else {
            panic!("payload should parse: {json}");
        };
        event
    }

    #[test]
    fn parses_reaction_callback() {
        let event = parse(
            r#"{"type":"event_callback","event_id":"E1","event":{"type":"reaction_added",
                "reaction":"syussya","user":"U1","item":{"type":"message","ts":"1700000000.000100","channel":"C1"}}}"#,
        );
        assert_eq!(event.kind, PayloadType::EventCallback);
        assert_eq!(event.event_id.as_deref(), Some("E1"));
        let Some(inner) = event.event else {
            panic!("event missing");
        };
        assert!(inner.is_reaction_added());
        assert!(inner.has_reaction("syussya"));
        assert_eq!(
            inner.target_reaction(),
            Some(TargetReaction {
                user_id: "U1".into(),
                channel_id: "C1".into(),
                message_ts: "1700000000.000100".into(),
            })
        );
    }

    #[test]
    fn parses_url_verification() {
        let event = parse(r#"{"type":"url_verification","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P","token":"x"}"#);
        assert_eq!(event.kind, PayloadType::UrlVerification);
        assert!(event.event.is_none());
    }

    #[test]
    fn unknown_envelope_type_is_tolerated() {
        let event = parse(r#"{"type":"app_rate_limited","minute_rate_limited":1518467820}"#);
        assert_eq!(event.kind, PayloadType::Other);
    }

    #[test]
    fn non_reaction_events_deserialize_without_item() {
        let event = parse(r#"{"type":"event_callback","event":{"type":"message","text":"hi"}}"#);
        let Some(inner) = event.event else {
            panic!("event missing");
        };
        assert!(!inner.is_reaction_added());
        assert!(inner.target_reaction().is_none());
    }

    #[test]
    fn events_with_object_user_deserialize() {
        let event = parse(
            r#"{"type":"event_callback","event_id":"E7","event":{"type":"user_change","user":{"id":"U1","name":"someone"}}}"#,
        );
        let Some(inner) = event.event else {
            panic!("event missing");
        };
        assert!(!inner.is_reaction_added());
        assert!(!inner.has_reaction("syussya"));
    }

    #[test]
    fn non_string_reaction_fields_yield_no_target() {
        let event = parse(
            r#"{"type":"event_callback","event":{"type":"reaction_added","reaction":"syussya",
                "user":{"id":"U1"},"item":{"ts":1700000000,"channel":"C1"}}}"#,
        );
        let Some(inner) = event.event else {
            panic!("event missing");
        };
        assert!(inner.has_reaction("syussya"));
        assert!(inner.target_reaction().is_none());
    }

    #[test]
    fn missing_type_still_carries_the_event() {
        let event = parse(r#"{"event":{"type":"reaction_added"}}"#);
        assert_eq!(event.kind, PayloadType::Other);
        assert!(event.event.is_some_and(|e| e.is_reaction_added()));
    }

    #[test]
    fn non_object_bodies_are_parse_errors() {
        assert!(InboundEvent::from_slice(b"not json").is_err());
        assert!(InboundEvent::from_slice(b"42").is_err());
        assert!(InboundEvent::from_slice(br#"{"type":"event_callback","event":"x"}"#).is_err());
    }
}
