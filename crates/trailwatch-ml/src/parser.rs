use async_trait::async_trait;
use trailwatch_domain::DispatchMessages;

use crate::error::MlError;

/// Extracts structured dispatches from a raw dispatch-channel transcription.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DispatchParser: Send + Sync {
    async fn parse_dispatches(&self, transcription: &str) -> Result<DispatchMessages, MlError>;
}
