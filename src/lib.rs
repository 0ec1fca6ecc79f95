//! # attendance-hook
//!
//! Slack Events API receiver that records office attendance. When a user
//! adds the configured reaction (`:syussya:` by default) to a message in
//! the target channel, the service looks up that message, derives an
//! arrival date from it and appends one row per user and date to the
//! attendance sheet.
//!
//! ## Architecture
//!
//! ```text
//! Slack (POST /slack/events)
//!     │
//!     ├── Webhook handler (api/)
//!     │
//!     ├── AttendanceService (service/)
//!     │     filter → channel gate → resolve → dedup → append
//!     │
//!     ├── SlackClient (slack/)          conversations.history
//!     ├── ArrivalDateRule, ProcessedEventCache (domain/)
//!     │
//!     └── TabularStore / PropertyStore (persistence/)
//!           PostgreSQL or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod slack;
