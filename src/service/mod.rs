//! Service layer: business logic orchestration.
//!
//! [`AttendanceService`] filters webhook deliveries, resolves the reacted
//! message through a [`crate::slack::MessageResolver`] and writes to the
//! [`crate::persistence::TabularStore`].

pub mod attendance_service;

pub use attendance_service::{AttendanceService, WebhookOutcome};
