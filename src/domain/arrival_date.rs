//! Arrival date derivation from a Slack message timestamp.
//!
//! The arrival date is the calendar date of the reacted message shifted
//! forward by a fixed number of days, rendered as `YYYY/MM/DD`.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};

use crate::error::HookError;

/// Format of the arrival date cell.
pub const ARRIVAL_DATE_FORMAT: &str = "%Y/%m/%d";

/// Format of the recorded-at cell.
pub const RECORDED_AT_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Rule turning a message timestamp into an arrival date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalDateRule {
    offset_days: u32,
    calendar: FixedOffset,
}

impl ArrivalDateRule {
    /// Creates a rule adding `offset_days` to the message date as seen in
    /// the `calendar` time zone.
    #[must_use]
    pub const fn new(offset_days: u32, calendar: FixedOffset) -> Self {
        Self {
            offset_days,
            calendar,
        }
    }

    /// Computes the arrival date for a message timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidTimestamp`] if `ts` is not a seconds
    /// value or the shifted date is out of range.
    pub fn arrival_date(&self, ts: &str) -> Result<NaiveDate, HookError> {
        let sent_at = parse_message_ts(ts)?;
        sent_at
            .with_timezone(&self.calendar)
            .date_naive()
            .checked_add_days(Days::new(u64::from(self.offset_days)))
            .ok_or_else(|| HookError::InvalidTimestamp(format!("{ts}: date out of range")))
    }

    /// Computes the arrival date and renders it as `YYYY/MM/DD`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ArrivalDateRule::arrival_date`].
    pub fn format_arrival_date(&self, ts: &str) -> Result<String, HookError> {
        Ok(self.arrival_date(ts)?.format(ARRIVAL_DATE_FORMAT).to_string())
    }

    /// Renders an instant as the recorded-at cell in this rule's calendar.
    #[must_use]
    pub fn format_recorded_at(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.calendar)
            .format(RECORDED_AT_FORMAT)
            .to_string()
    }
}

/// Parses a Slack fixed-point seconds timestamp (`"1700000000.000100"`).
///
/// Fractional digits beyond nanosecond precision are ignored.
///
/// # Errors
///
/// Returns [`HookError::InvalidTimestamp`] on anything that is not
/// `digits[.digits]`.
pub fn parse_message_ts(ts: &str) -> Result<DateTime<Utc>, HookError> {
    let invalid = || HookError::InvalidTimestamp(ts.to_string());
    let (secs, frac) = ts.split_once('.').unwrap_or((ts, ""));
    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let secs: i64 = secs.parse().map_err(|_| invalid())?;
    let nanos = frac
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));
    DateTime::from_timestamp(secs, nanos).ok_or_else(invalid)
}
