//! Attendance service: filters webhook events and records attendance.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::config::HookConfig;
use crate::domain::attendance::is_duplicate;
use crate::domain::{
    ATTENDANCE_HEADER, ArrivalDateRule, AttendanceRecord, InboundEvent, PROCESSED_EVENTS_KEY,
    PayloadType, ProcessedEventCache, TargetReaction,
};
use crate::error::HookError;
use crate::persistence::{PropertyStore, TabularStore};
use crate::slack::MessageResolver;

/// Terminal state of one webhook delivery.
///
/// Every variant is answered with HTTP 200 and a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// URL verification handshake; the body is the challenge verbatim.
    Challenge(String),
    /// The envelope carries no event.
    NoEvent,
    /// The event id was handled by an earlier delivery.
    AlreadyProcessed,
    /// The event is not `reaction_added`.
    NotTargetEvent,
    /// The reaction is not the configured emoji.
    NotTargetReaction,
    /// The reaction is outside the configured channel.
    NotTargetChannel,
    /// A row for this user and arrival date already exists.
    AlreadyRecorded,
    /// A new row was appended.
    Recorded(AttendanceRecord),
}

impl WebhookOutcome {
    /// Response text sent back to the chat platform.
    #[must_use]
    pub fn response_text(&self) -> &str {
        match self {
            Self::Challenge(challenge) => challenge,
            Self::NoEvent => "No event",
            Self::AlreadyProcessed => "Already processed",
            Self::NotTargetEvent => "Not reaction_added",
            Self::NotTargetReaction => "Not target reaction",
            Self::NotTargetChannel => "Not target channel",
            Self::AlreadyRecorded => "Already recorded",
            Self::Recorded(_) => "OK",
        }
    }

    /// Returns `true` if a row was written.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

impl IntoResponse for WebhookOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Challenge(challenge) => challenge.into_response(),
            other => other.response_text().to_string().into_response(),
        }
    }
}

/// Orchestrates one webhook delivery end to end.
///
/// Stateless coordinator: holds the configuration, the message resolver
/// and the two stores. Each call to [`AttendanceService::handle`] walks
/// filter → channel gate → resolve → dedup → write and stops at the first
/// rejection.
///
/// The duplicate scan and the append are not atomic, nor is the
/// processed-event cache update. Concurrent deliveries for the same user
/// and date can both write.
#[derive(Debug, Clone)]
pub struct AttendanceService {
    config: Arc<HookConfig>,
    resolver: Arc<dyn MessageResolver>,
    sheets: Arc<dyn TabularStore>,
    properties: Arc<dyn PropertyStore>,
    date_rule: ArrivalDateRule,
}

impl AttendanceService {
    /// Creates a new `AttendanceService`.
    #[must_use]
    pub fn new(
        config: Arc<HookConfig>,
        resolver: Arc<dyn MessageResolver>,
        sheets: Arc<dyn TabularStore>,
        properties: Arc<dyn PropertyStore>,
    ) -> Self {
        let date_rule = ArrivalDateRule::new(config.arrival_offset_days, config.calendar_offset());
        Self {
            config,
            resolver,
            sheets,
            properties,
            date_rule,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Parses a raw webhook body and handles it.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::MalformedPayload`] if the body is not a
    /// webhook payload, plus everything [`AttendanceService::handle`]
    /// returns.
    pub async fn handle_body(&self, body: &[u8]) -> Result<WebhookOutcome, HookError> {
        let payload = InboundEvent::from_slice(body)?;
        self.handle(payload).await
    }

    /// Handles one parsed webhook payload.
    ///
    /// # Errors
    ///
    /// - [`HookError::MalformedPayload`] if a target reaction lacks its
    ///   user, channel or message timestamp.
    /// - [`HookError::MessageNotFound`] if the reacted message cannot be
    ///   fetched.
    /// - [`HookError::InvalidTimestamp`] if the fetched timestamp is
    ///   unusable.
    /// - [`HookError::Persistence`] on store failures.
    pub async fn handle(&self, payload: InboundEvent) -> Result<WebhookOutcome, HookError> {
        if payload.kind == PayloadType::UrlVerification {
            tracing::info!("answering url verification");
            return Ok(WebhookOutcome::Challenge(
                payload.challenge.unwrap_or_default(),
            ));
        }

        let Some(event) = payload.event else {
            return Ok(reject(WebhookOutcome::NoEvent));
        };

        let mut cache = None;
        if let Some(event_id) = payload.event_id.as_deref() {
            let loaded = self.load_processed_events().await?;
            if loaded.contains(event_id) {
                tracing::debug!(event_id, "event already processed");
                return Ok(WebhookOutcome::AlreadyProcessed);
            }
            cache = Some(loaded);
        }

        if !event.is_reaction_added() {
            return Ok(reject(WebhookOutcome::NotTargetEvent));
        }
        if !event.has_reaction(&self.config.target_reaction) {
            return Ok(reject(WebhookOutcome::NotTargetReaction));
        }

        let target = event.target_reaction().ok_or_else(|| {
            HookError::MalformedPayload(
                "reaction_added event without user, item.channel or item.ts".to_string(),
            )
        })?;

        if target.channel_id != self.config.target_channel_id {
            return Ok(reject(WebhookOutcome::NotTargetChannel));
        }

        let outcome = self.record(&target).await?;

        if outcome.is_recorded()
            && let (Some(mut cache), Some(event_id)) = (cache, payload.event_id.as_deref())
        {
            cache.record(event_id);
            let serialized = cache
                .to_json()
                .map_err(|e| HookError::Internal(e.to_string()))?;
            self.properties.set(PROCESSED_EVENTS_KEY, &serialized).await?;
        }

        Ok(outcome)
    }

    /// Resolves the reacted message, derives the arrival date and appends
    /// a row unless one exists for the same user and date.
    ///
    /// # Errors
    ///
    /// See [`AttendanceService::handle`].
    pub async fn record(&self, target: &TargetReaction) -> Result<WebhookOutcome, HookError> {
        let message = self
            .resolver
            .resolve(&target.channel_id, &target.message_ts)
            .await
            .ok_or_else(|| HookError::MessageNotFound {
                channel: target.channel_id.clone(),
                ts: target.message_ts.clone(),
            })?;

        let arrival_date = self.date_rule.format_arrival_date(&message.ts)?;
        let sheet = self.config.sheet_name.as_str();

        self.sheets.ensure_sheet(sheet, &ATTENDANCE_HEADER).await?;
        let rows = self.sheets.rows(sheet).await?;
        if is_duplicate(&rows, &target.user_id, &arrival_date) {
            tracing::info!(user = %target.user_id, %arrival_date, "attendance already recorded");
            return Ok(WebhookOutcome::AlreadyRecorded);
        }

        let record = AttendanceRecord {
            recorded_at: self.date_rule.format_recorded_at(Utc::now()),
            user_id: target.user_id.clone(),
            arrival_date,
        };
        self.sheets.append_row(sheet, record.to_row()).await?;

        tracing::info!(
            user = %record.user_id,
            arrival_date = %record.arrival_date,
            "attendance recorded"
        );
        Ok(WebhookOutcome::Recorded(record))
    }

    /// Loads the processed-event cache. An unreadable stored value is
    /// discarded and replaced by an empty cache.
    async fn load_processed_events(&self) -> Result<ProcessedEventCache, HookError> {
        let capacity = self.config.processed_events_capacity;
        let Some(raw) = self.properties.get(PROCESSED_EVENTS_KEY).await? else {
            return Ok(ProcessedEventCache::new(capacity));
        };
        Ok(ProcessedEventCache::from_json(&raw, capacity).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "discarding unreadable processed-event cache");
            ProcessedEventCache::new(capacity)
        }))
    }
}

fn reject(outcome: WebhookOutcome) -> WebhookOutcome {
    tracing::debug!(reason = outcome.response_text(), "event rejected");
    outcome
}
