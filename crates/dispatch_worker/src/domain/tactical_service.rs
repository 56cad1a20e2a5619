use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use trailwatch_chat::blocks::{thread_communication_blocks, ThreadCommunicationBlocksInput};
use trailwatch_chat::{ChatPoster, OutgoingMessage};
use trailwatch_domain::TranscriptionResponse;

use crate::domain::error::{WorkerError, WorkerResult};
use crate::domain::gate::AdornedKey;
use crate::domain::retry::post_with_throttle_retry;
use crate::domain::thread_registry::ThreadRegistry;

/// Handles transmissions on activated tactical channels: look up the live
/// thread and reply the transcription into it.
pub struct TacticalService {
    chat: Arc<dyn ChatPoster>,
    threads: Arc<ThreadRegistry>,
}

impl TacticalService {
    pub fn new(chat: Arc<dyn ChatPoster>, threads: Arc<ThreadRegistry>) -> Self {
        Self { chat, threads }
    }

    pub async fn process_tactical_call(
        &self,
        cancel: &CancellationToken,
        parsed_key: &AdornedKey,
        transcription: &TranscriptionResponse,
    ) -> WorkerResult<()> {
        let tgid = &parsed_key.key.talkgroup;

        let thread_root = self
            .threads
            .lookup(tgid)
            .await?
            .ok_or_else(|| WorkerError::NoThreadRoot(tgid.clone()))?;

        debug!(talkgroup = %tgid, thread_root = %thread_root, "found thread for talkgroup");

        let info = parsed_key
            .talkgroup
            .ok_or_else(|| WorkerError::UnknownTalkgroup(tgid.clone()))?;

        let blocks = thread_communication_blocks(&ThreadCommunicationBlocksInput {
            channel: info.full_name.to_string(),
            message: transcription.transcription.clone(),
            ts: Utc::now(),
        });

        post_with_throttle_retry(
            self.chat.as_ref(),
            cancel,
            OutgoingMessage::reply(blocks, &thread_root),
        )
        .await?;

        debug!(talkgroup = %tgid, thread_root = %thread_root, "posted transcription into thread");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailwatch_chat::MockChatPoster;
    use trailwatch_domain::ObjectKey;
    use trailwatch_kv::MockKvStore;

    fn adorned(tgid: &str) -> AdornedKey {
        let key = ObjectKey::parse(&format!("{tgid}-1750542500_854412500.2-call_1880.wav")).unwrap();
        let talkgroup = trailwatch_domain::talkgroup_from_tgid(tgid);
        AdornedKey { key, talkgroup }
    }

    fn transcription(text: &str) -> TranscriptionResponse {
        TranscriptionResponse {
            filename: "f.wav".to_string(),
            transcription: text.to_string(),
        }
    }

    #[tokio::test]
    async fn replies_into_live_thread() {
        let mut kv = MockKvStore::new();
        kv.expect_get()
            .withf(|key| key == "tg:1385")
            .returning(|_| Ok(Some("111.222".to_string())));

        let mut chat = MockChatPoster::new();
        chat.expect_post_message()
            .withf(|message| {
                message.thread_root.as_deref() == Some("111.222")
                    && !message.broadcast
                    && serde_json::to_string(&message.blocks)
                        .unwrap()
                        .contains("Medic 72 on scene")
            })
            .times(1)
            .returning(|_| Ok("111.444".to_string()));

        let service = TacticalService::new(
            Arc::new(chat),
            Arc::new(ThreadRegistry::new(Arc::new(kv))),
        );
        service
            .process_tactical_call(
                &CancellationToken::new(),
                &adorned("1385"),
                &transcription("Medic 72 on scene"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_thread_root_is_a_quiet_skip() {
        let mut kv = MockKvStore::new();
        kv.expect_get().returning(|_| Ok(None));

        // Chat must never be called without a live thread.
        let service = TacticalService::new(
            Arc::new(MockChatPoster::new()),
            Arc::new(ThreadRegistry::new(Arc::new(kv))),
        );
        let err = service
            .process_tactical_call(
                &CancellationToken::new(),
                &adorned("1385"),
                &transcription("Medic 72 on scene"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::NoThreadRoot(_)));
    }

    #[tokio::test]
    async fn unknown_talkgroup_is_fatal_for_the_record() {
        let mut kv = MockKvStore::new();
        kv.expect_get()
            .returning(|_| Ok(Some("111.222".to_string())));

        let service = TacticalService::new(
            Arc::new(MockChatPoster::new()),
            Arc::new(ThreadRegistry::new(Arc::new(kv))),
        );
        let err = service
            .process_tactical_call(
                &CancellationToken::new(),
                &adorned("4242"),
                &transcription("unknown channel traffic"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::UnknownTalkgroup(_)));
    }
}
