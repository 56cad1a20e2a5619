use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::poster::{ChatError, ChatPoster, OutgoingMessage};

const DEFAULT_API_BASE: &str = "https://slack.com/api";
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    ts: Option<String>,
    error: Option<String>,
}

/// Slack Web API client. One client posts to one channel.
pub struct SlackChatClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
    channel_id: String,
    default_timeout: Duration,
}

impl SlackChatClient {
    pub fn new(token: &str, channel_id: &str, default_timeout: Duration) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token, channel_id, default_timeout)
    }

    pub fn with_api_base(
        api_base: &str,
        token: &str,
        channel_id: &str,
        default_timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            channel_id: channel_id.to_string(),
            default_timeout,
        }
    }
}

#[async_trait]
impl ChatPoster for SlackChatClient {
    async fn post_message(&self, message: OutgoingMessage) -> Result<String, ChatError> {
        let mut body = json!({
            "channel": self.channel_id,
            "blocks": message.blocks,
        });
        if let Some(thread_root) = &message.thread_root {
            body["thread_ts"] = json!(thread_root);
        }
        if message.broadcast {
            body["reply_broadcast"] = json!(true);
        }

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.token)
            .json(&body)
            .timeout(self.default_timeout)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        if response.status().as_u16() == 429 {
            return Err(ChatError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Api(format!("status {}", status.as_u16())));
        }

        let posted: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;

        if !posted.ok {
            let error = posted.error.unwrap_or_else(|| "unknown error".to_string());
            // Slack can signal throttling in the body as well as via 429.
            if error == "rate_limited" || error == "ratelimited" {
                return Err(ChatError::RateLimited {
                    retry_after: DEFAULT_RETRY_AFTER,
                });
            }
            return Err(ChatError::Api(error));
        }

        let ts = posted
            .ts
            .ok_or_else(|| ChatError::Decode("response missing ts".to_string()))?;

        debug!(ts = %ts, threaded = message.thread_root.is_some(), "posted chat message");
        Ok(ts)
    }
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Duration {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_header_parses_seconds() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "30".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Duration::from_secs(30));
    }

    #[test]
    fn missing_or_garbage_retry_after_falls_back() {
        let headers = reqwest::header::HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), DEFAULT_RETRY_AFTER);

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "soon".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), DEFAULT_RETRY_AFTER);
    }
}
