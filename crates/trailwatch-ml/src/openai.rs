use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use trailwatch_domain::DispatchMessages;

use crate::decode::decode_dispatch_messages;
use crate::error::MlError;
use crate::parser::DispatchParser;
use crate::prompt::{response_schema, SYSTEM_PROMPT};

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// OpenAI chat-completions backend with a strict JSON-schema response format.
pub struct OpenAiDispatchParser {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    default_timeout: Duration,
}

impl OpenAiDispatchParser {
    pub fn new(base_url: &str, api_key: &str, model: &str, default_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            default_timeout,
        }
    }
}

#[async_trait]
impl DispatchParser for OpenAiDispatchParser {
    async fn parse_dispatches(&self, transcription: &str) -> Result<DispatchMessages, MlError> {
        debug!(model = %self.model, "requesting dispatch parse from openai");

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": transcription},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "dispatch_messages",
                    "schema": response_schema(),
                    "strict": true,
                },
            },
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.default_timeout)
            .send()
            .await
            .map_err(|e| MlError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MlError::Status(status.as_u16()));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| MlError::Decode(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(MlError::Empty)?;

        decode_dispatch_messages(&content, transcription)
    }
}
