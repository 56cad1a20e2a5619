use std::time::Duration;

use async_nats::jetstream::{self, stream::Config as StreamConfig};
use bytes::Bytes;
use tracing::info;

use crate::error::QueueError;

pub struct NatsClient {
    jetstream: jetstream::Context,
}

impl NatsClient {
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, QueueError> {
        info!(url, ?timeout, "connecting to nats");

        let client = async_nats::ConnectOptions::new()
            .connection_timeout(timeout)
            .connect(url)
            .await
            .map_err(|e| QueueError::Connect(e.to_string()))?;

        let jetstream = jetstream::new(client);

        info!("connected to nats");
        Ok(Self { jetstream })
    }

    /// Get-or-create the event stream. Subjects follow the `<stream>.*`
    /// convention.
    pub async fn ensure_stream(&self, stream_name: &str) -> Result<(), QueueError> {
        let stream_config = StreamConfig {
            name: stream_name.to_string(),
            subjects: vec![format!("{}.*", stream_name)],
            description: Some("S3 object-created notifications".to_string()),
            ..Default::default()
        };

        match self.jetstream.get_stream(stream_name).await {
            Ok(_) => {
                info!(stream = stream_name, "stream already exists");
            }
            Err(_) => {
                self.jetstream
                    .create_stream(stream_config)
                    .await
                    .map_err(|e| QueueError::Stream(e.to_string()))?;
                info!(stream = stream_name, "created stream");
            }
        }

        Ok(())
    }

    pub async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), QueueError> {
        self.jetstream
            .publish(subject.to_string(), payload)
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))?
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))?;
        Ok(())
    }

    pub fn jetstream(&self) -> &jetstream::Context {
        &self.jetstream
    }
}
