use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use trailwatch_chat::blocks::{
    channel_closed_blocks, rescue_trail_blocks, ChannelClosedBlocksInput, RescueTrailBlocksInput,
};
use trailwatch_chat::{ChatPoster, OutgoingMessage};
use trailwatch_domain::{talkgroup_from_radio_short_code, TranscriptionResponse};
use trailwatch_ml::DispatchParser;

use crate::domain::error::{WorkerError, WorkerResult};
use crate::domain::gate::{AdornedKey, AllowListGate};
use crate::domain::retry::post_with_throttle_retry;
use crate::domain::select::select_trail_rescue_message;
use crate::domain::thread_registry::ThreadRegistry;

/// Budget for the scheduled close post. The worker that scheduled it is long
/// gone by then, so the task carries its own deadline.
const AUTO_CLOSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Handles dispatch-channel transmissions: classify, activate the announced
/// tactical channel, post the activation header, and schedule the close.
pub struct DispatchService {
    parser: Arc<dyn DispatchParser>,
    chat: Arc<dyn ChatPoster>,
    gate: Arc<AllowListGate>,
    threads: Arc<ThreadRegistry>,
    dispatch_talkgroup: String,
    activation_duration: Duration,
}

impl DispatchService {
    pub fn new(
        parser: Arc<dyn DispatchParser>,
        chat: Arc<dyn ChatPoster>,
        gate: Arc<AllowListGate>,
        threads: Arc<ThreadRegistry>,
        dispatch_talkgroup: String,
        activation_duration: Duration,
    ) -> Self {
        Self {
            parser,
            chat,
            gate,
            threads,
            dispatch_talkgroup,
            activation_duration,
        }
    }

    /// Finishing without error and without action is the common case: most
    /// dispatch traffic is not a trail rescue.
    pub async fn process_dispatch_call(
        &self,
        cancel: &CancellationToken,
        parsed_key: &AdornedKey,
        transcription: &TranscriptionResponse,
        seen: &mut HashSet<u64>,
    ) -> WorkerResult<()> {
        debug!(
            talkgroup = %parsed_key.key.talkgroup,
            transcription = %transcription.transcription,
            "processing fire dispatch transcription"
        );

        let dispatches = self
            .parser
            .parse_dispatches(&transcription.transcription)
            .await?;

        debug!(count = dispatches.messages.len(), "parsed dispatch messages");

        let Some((selected, fingerprint)) = select_trail_rescue_message(&dispatches, seen) else {
            debug!("no trail rescue call found in dispatch messages");
            return Ok(());
        };
        let selected = selected.clone();

        let tactical = talkgroup_from_radio_short_code(&selected.tac_channel)
            .ok_or_else(|| WorkerError::UnknownTacChannel(selected.tac_channel.clone()))?;

        self.gate
            .admit(tactical.tgid, self.activation_duration)
            .await?;
        info!(
            tac_channel = %selected.tac_channel,
            talkgroup = tactical.tgid,
            fingerprint,
            "added tactical channel to allowed talkgroups"
        );

        let expires_at =
            Utc::now() + chrono::Duration::seconds(self.activation_duration.as_secs() as i64);

        let header = rescue_trail_blocks(&RescueTrailBlocksInput {
            tac_channel: selected.tac_channel.clone(),
            tac_tgid: tactical.tgid.to_string(),
            tac_short_name: tactical.short_name.to_string(),
            dispatch_tgid: self.dispatch_talkgroup.clone(),
            transcription_text: transcription.transcription.clone(),
            expires_at,
        });

        let thread_root =
            post_with_throttle_retry(self.chat.as_ref(), cancel, OutgoingMessage::top_level(header))
                .await?;
        debug!(
            tac_channel = %selected.tac_channel,
            thread_root = %thread_root,
            "posted activation header"
        );

        // The thread is already posted; losing the mapping only drops
        // tactical replies for this window.
        if let Err(e) = self
            .threads
            .record(tactical.tgid, &thread_root, self.activation_duration)
            .await
        {
            error!(error = %e, talkgroup = tactical.tgid, "failed to record thread root");
        }

        self.schedule_auto_close(selected.tac_channel.clone(), thread_root);
        Ok(())
    }

    /// Post the "channel closed" message when the activation window ends.
    /// Runs detached with its own cancellation scope: the activation outlives
    /// any worker deadline, and the close is best-effort by design.
    fn schedule_auto_close(&self, tac_channel: String, thread_root: String) {
        let chat = Arc::clone(&self.chat);
        let delay = self.activation_duration;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(tac_channel = %tac_channel, "activation expired, posting channel closed message");

            let blocks = channel_closed_blocks(&ChannelClosedBlocksInput {
                channel: tac_channel.clone(),
                closed_at: Utc::now(),
            });
            let message = OutgoingMessage::broadcast_reply(blocks, &thread_root);

            let close_cancel = CancellationToken::new();
            match tokio::time::timeout(
                AUTO_CLOSE_TIMEOUT,
                post_with_throttle_retry(chat.as_ref(), &close_cancel, message),
            )
            .await
            {
                Ok(Ok(_)) => {
                    debug!(tac_channel = %tac_channel, thread_root = %thread_root, "posted channel closed message");
                }
                Ok(Err(e)) => {
                    error!(error = %e, tac_channel = %tac_channel, "failed to post channel closed message");
                }
                Err(_) => {
                    error!(tac_channel = %tac_channel, "channel closed post timed out");
                }
            }
        });
    }
}
