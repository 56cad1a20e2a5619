pub mod blocks;
mod client;
mod poster;

pub use client::SlackChatClient;
pub use poster::{ChatError, ChatPoster, OutgoingMessage};

#[cfg(any(test, feature = "testing"))]
pub use poster::MockChatPoster;
