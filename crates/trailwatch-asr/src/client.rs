use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use trailwatch_domain::TranscriptionResponse;

#[derive(Error, Debug)]
pub enum AsrError {
    #[error("failed to send transcription request: {0}")]
    Request(String),

    #[error("transcription endpoint returned status {0}")]
    Status(u16),

    #[error("failed to decode transcription response: {0}")]
    Decode(String),
}

/// External speech-to-text endpoint.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        file_name: &str,
        audio: Vec<u8>,
    ) -> Result<TranscriptionResponse, AsrError>;
}

/// HTTP client for the ASR service: multipart POST with a `file` part,
/// JSON `{filename, transcription}` back.
pub struct AsrClient {
    client: reqwest::Client,
    endpoint: String,
    default_timeout: Duration,
}

impl AsrClient {
    pub fn new(endpoint: &str, default_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            default_timeout,
        }
    }
}

#[async_trait]
impl Transcriber for AsrClient {
    async fn transcribe(
        &self,
        file_name: &str,
        audio: Vec<u8>,
    ) -> Result<TranscriptionResponse, AsrError> {
        debug!(file_name, bytes = audio.len(), "sending transcription request");

        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string()),
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .timeout(self.default_timeout)
            .send()
            .await
            .map_err(|e| AsrError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AsrError::Status(status.as_u16()));
        }

        response
            .json::<TranscriptionResponse>()
            .await
            .map_err(|e| AsrError::Decode(e.to_string()))
    }
}
