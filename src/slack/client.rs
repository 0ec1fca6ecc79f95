//! Slack Web API client used to resolve reacted messages.

use async_trait::async_trait;
use serde::Deserialize;

use super::{MessageResolver, ResolvedMessage};

#[derive(Debug, Deserialize)]
struct ConversationsHistoryResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    messages: Vec<ResolvedMessage>,
    #[serde(default)]
    error: Option<String>,
}

/// Minimal Slack Web API client authenticated with a bot token.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Creates a client for `api_base` (e.g. `https://slack.com/api`).
    #[must_use]
    pub fn new(api_base: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
        }
    }

    /// Fetches the single message at or before `ts` in `channel` via
    /// `conversations.history`.
    ///
    /// Transport failures, `ok != true`, malformed bodies and empty
    /// results all yield `None`.
    pub async fn latest_message(&self, channel: &str, ts: &str) -> Option<ResolvedMessage> {
        let result = self
            .http
            .get(format!("{}/conversations.history", self.api_base))
            .bearer_auth(&self.token)
            .query(&[
                ("channel", channel),
                ("latest", ts),
                ("limit", "1"),
                ("inclusive", "true"),
            ])
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(channel, ts, error = %err, "conversations.history request failed");
                return None;
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(channel, ts, %status, error = %err, "conversations.history body unreadable");
                return None;
            }
        };

        // The body is inspected regardless of HTTP status; only `ok`
        // decides success.
        let parsed: ConversationsHistoryResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(channel, ts, %status, error = %err, "conversations.history returned malformed json");
                return None;
            }
        };

        if !parsed.ok {
            tracing::warn!(
                channel,
                ts,
                %status,
                error = parsed.error.as_deref().unwrap_or("unknown error"),
                "conversations.history failed"
            );
            return None;
        }

        let message = parsed.messages.into_iter().next();
        if message.is_none() {
            tracing::debug!(channel, ts, "conversations.history returned no messages");
        }
        message
    }
}

#[async_trait]
impl MessageResolver for SlackClient {
    async fn resolve(&self, channel: &str, ts: &str) -> Option<ResolvedMessage> {
        self.latest_message(channel, ts).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};

    use super::*;

    async fn setup_mock_server() -> (ServerGuard, SlackClient) {
        let server = Server::new_async().await;
        let client = SlackClient::new(&server.url(), "xoxb-test");
        (server, client)
    }

    fn history_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("channel".into(), "C_TARGET".into()),
            Matcher::UrlEncoded("latest".into(), "1700000000.000100".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
            Matcher::UrlEncoded("inclusive".into(), "true".into()),
        ])
    }

    #[tokio::test]
    async fn returns_first_message() {
        let (mut server, client) = setup_mock_server().await;
        let mock = server
            .mock("GET", "/conversations.history")
            .match_query(history_query())
            .match_header("authorization", "Bearer xoxb-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ok":true,"messages":[{"type":"message","user":"U9","text":"出社します","ts":"1700000000.000100"}],"has_more":true}"#,
            )
            .create_async()
            .await;

        let Some(message) = client.resolve("C_TARGET", "1700000000.000100").await else {
            panic!("expected a message");
        };
        assert_eq!(message.ts, "1700000000.000100");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_error_is_absent() {
        let (mut server, client) = setup_mock_server().await;
        let _m = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok":false,"error":"channel_not_found"}"#)
            .create_async()
            .await;

        assert!(client.resolve("C_TARGET", "1700000000.000100").await.is_none());
    }

    #[tokio::test]
    async fn empty_history_is_absent() {
        let (mut server, client) = setup_mock_server().await;
        let _m = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok":true,"messages":[]}"#)
            .create_async()
            .await;

        assert!(client.resolve("C_TARGET", "1700000000.000100").await.is_none());
    }

    #[tokio::test]
    async fn server_error_with_html_body_is_absent() {
        let (mut server, client) = setup_mock_server().await;
        let _m = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("<html>unavailable</html>")
            .create_async()
            .await;

        assert!(client.resolve("C_TARGET", "1700000000.000100").await.is_none());
    }

    #[tokio::test]
    async fn transport_failure_is_absent() {
        // Nothing listens on port 9 of the loopback address.
        let client = SlackClient::new("http://127.0.0.1:9", "xoxb-test");
        assert!(client.resolve("C_TARGET", "1700000000.000100").await.is_none());
    }
}
