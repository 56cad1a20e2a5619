use tokio_util::sync::CancellationToken;
use tracing::warn;
use trailwatch_chat::{ChatError, ChatPoster, OutgoingMessage};

use crate::domain::error::{WorkerError, WorkerResult};

/// Post a chat message under the throttle policy shared by both handlers and
/// the scheduled auto-close: on a retryable throttle, wait the advertised
/// delay (or until the caller is cancelled, whichever comes first) and try
/// again. Any other error propagates.
pub async fn post_with_throttle_retry(
    chat: &dyn ChatPoster,
    cancel: &CancellationToken,
    message: OutgoingMessage,
) -> WorkerResult<String> {
    loop {
        match chat.post_message(message.clone()).await {
            Ok(ts) => return Ok(ts),
            Err(ChatError::RateLimited { retry_after }) => {
                warn!(?retry_after, "chat throttled, waiting to retry");
                tokio::select! {
                    _ = cancel.cancelled() => return Err(WorkerError::Cancelled),
                    _ = tokio::time::sleep(retry_after) => {}
                }
            }
            Err(e) => return Err(WorkerError::Chat(e)),
        }
    }
}
