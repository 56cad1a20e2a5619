use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("failed to connect to nats: {0}")]
    Connect(String),

    #[error("failed to set up stream: {0}")]
    Stream(String),

    #[error("failed to set up consumer: {0}")]
    Consumer(String),

    #[error("failed to receive message: {0}")]
    Receive(String),

    #[error("failed to acknowledge message: {0}")]
    Ack(String),

    #[error("failed to publish message: {0}")]
    Publish(String),
}
