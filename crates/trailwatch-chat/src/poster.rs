use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("failed to send chat request: {0}")]
    Request(String),

    #[error("chat api rejected message: {0}")]
    Api(String),

    #[error("chat api throttled, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("failed to decode chat response: {0}")]
    Decode(String),
}

/// A block-structured message bound for the configured channel.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub blocks: Vec<Value>,
    /// Reply into this thread instead of posting top-level.
    pub thread_root: Option<String>,
    /// Also surface the threaded reply in the channel.
    pub broadcast: bool,
}

impl OutgoingMessage {
    pub fn top_level(blocks: Vec<Value>) -> Self {
        Self {
            blocks,
            thread_root: None,
            broadcast: false,
        }
    }

    pub fn reply(blocks: Vec<Value>, thread_root: &str) -> Self {
        Self {
            blocks,
            thread_root: Some(thread_root.to_string()),
            broadcast: false,
        }
    }

    pub fn broadcast_reply(blocks: Vec<Value>, thread_root: &str) -> Self {
        Self {
            blocks,
            thread_root: Some(thread_root.to_string()),
            broadcast: true,
        }
    }
}

/// Posts messages into the notification channel.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ChatPoster: Send + Sync {
    /// Post a message. The returned timestamp identifies the message; for a
    /// top-level post it is the thread root for subsequent replies.
    async fn post_message(&self, message: OutgoingMessage) -> Result<String, ChatError>;
}
