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
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

/// Ollama `/api/generate` backend with structured output. `format` carries
/// the response schema so the model emits the multi-message JSON directly.
pub struct OllamaDispatchParser {
    client: reqwest::Client,
    base_url: String,
    model: String,
    default_timeout: Duration,
}

impl OllamaDispatchParser {
    pub fn new(base_url: &str, model: &str, default_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            default_timeout,
        }
    }
}

#[async_trait]
impl DispatchParser for OllamaDispatchParser {
    async fn parse_dispatches(&self, transcription: &str) -> Result<DispatchMessages, MlError> {
        debug!(model = %self.model, "requesting dispatch parse from ollama");

        let body = json!({
            "model": self.model,
            "system": SYSTEM_PROMPT,
            "prompt": transcription,
            "format": response_schema(),
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .timeout(self.default_timeout)
            .send()
            .await
            .map_err(|e| MlError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MlError::Status(status.as_u16()));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| MlError::Decode(e.to_string()))?;

        if !generated.done || generated.response.is_empty() {
            return Err(MlError::Empty);
        }

        decode_dispatch_messages(&generated.response, transcription)
    }
}
