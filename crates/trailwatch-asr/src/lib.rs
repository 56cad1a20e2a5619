mod client;

pub use client::{AsrClient, AsrError, Transcriber};

#[cfg(any(test, feature = "testing"))]
pub use client::MockTranscriber;
