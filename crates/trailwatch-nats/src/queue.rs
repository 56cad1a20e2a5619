use std::time::Duration;

use async_nats::jetstream::{
    self,
    consumer::{pull, PullConsumer},
    AckKind,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, info};

use crate::error::QueueError;

/// One message taken off the queue. Acknowledgement is explicit; a nacked
/// message is redelivered to some consumer in the group.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait QueueMessage: Send + Sync {
    fn payload(&self) -> Bytes;
    async fn ack(&self) -> Result<(), QueueError>;
    async fn nack(&self) -> Result<(), QueueError>;
}

/// Competing-consumer view of the event stream. Every worker holds one of
/// these; the shared durable consumer spreads envelopes across them.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EventQueue: Send + Sync {
    /// Wait for the next message. `None` means the poll window elapsed with
    /// nothing to deliver; callers loop.
    async fn receive(&self) -> Result<Option<Box<dyn QueueMessage>>, QueueError>;
}

/// JetStream-backed queue: a durable pull consumer with explicit acks,
/// fetched one message at a time.
pub struct NatsEventQueue {
    consumer: PullConsumer,
    poll_wait: Duration,
}

impl NatsEventQueue {
    pub async fn new(
        jetstream: &jetstream::Context,
        stream_name: &str,
        consumer_name: &str,
        subject_filter: &str,
        poll_wait: Duration,
    ) -> Result<Self, QueueError> {
        debug!(
            stream = stream_name,
            consumer = consumer_name,
            subject = subject_filter,
            "creating jetstream consumer"
        );

        let stream = jetstream
            .get_stream(stream_name)
            .await
            .map_err(|e| QueueError::Stream(e.to_string()))?;

        let config = pull::Config {
            name: Some(consumer_name.to_string()),
            durable_name: Some(consumer_name.to_string()),
            filter_subject: subject_filter.to_string(),
            ack_policy: jetstream::consumer::AckPolicy::Explicit,
            ..Default::default()
        };

        let consumer = stream
            .create_consumer(config)
            .await
            .map_err(|e| QueueError::Consumer(e.to_string()))?;

        info!(
            stream = stream_name,
            consumer = consumer_name,
            "consumer ready"
        );

        Ok(Self {
            consumer,
            poll_wait,
        })
    }
}

#[async_trait]
impl EventQueue for NatsEventQueue {
    async fn receive(&self) -> Result<Option<Box<dyn QueueMessage>>, QueueError> {
        let mut batch = self
            .consumer
            .fetch()
            .max_messages(1)
            .expires(self.poll_wait)
            .messages()
            .await
            .map_err(|e| QueueError::Receive(e.to_string()))?;

        match batch.next().await {
            Some(Ok(message)) => Ok(Some(Box::new(NatsQueueMessage { message }))),
            Some(Err(e)) => Err(QueueError::Receive(e.to_string())),
            None => Ok(None),
        }
    }
}

struct NatsQueueMessage {
    message: jetstream::Message,
}

#[async_trait]
impl QueueMessage for NatsQueueMessage {
    fn payload(&self) -> Bytes {
        self.message.payload.clone()
    }

    async fn ack(&self) -> Result<(), QueueError> {
        self.message
            .ack()
            .await
            .map_err(|e| QueueError::Ack(e.to_string()))
    }

    async fn nack(&self) -> Result<(), QueueError> {
        self.message
            .ack_with(AckKind::Nak(None))
            .await
            .map_err(|e| QueueError::Ack(e.to_string()))
    }
}
