//! Chat platform access: resolving the message a reaction points at.
//!
//! [`MessageResolver`] is the seam between the recorder and the Slack Web
//! API. [`SlackClient`] is the production implementation.

pub mod client;

use async_trait::async_trait;
use serde::Deserialize;

pub use client::SlackClient;

/// A message returned by `conversations.history`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolvedMessage {
    /// Message timestamp, fixed-point seconds.
    pub ts: String,
}

/// Looks up the original message of a reaction.
#[async_trait]
pub trait MessageResolver: Send + Sync + std::fmt::Debug {
    /// Returns the message at or before `ts` in `channel`, or `None` when
    /// it cannot be fetched for any reason.
    async fn resolve(&self, channel: &str, ts: &str) -> Option<ResolvedMessage>;
}
