mod client;
mod error;
mod queue;

pub use client::NatsClient;
pub use error::QueueError;
pub use queue::{EventQueue, NatsEventQueue, QueueMessage};

#[cfg(any(test, feature = "testing"))]
pub use queue::{MockEventQueue, MockQueueMessage};
