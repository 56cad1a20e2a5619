use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use trailwatch_asr::Transcriber;
use trailwatch_domain::{has_wav_extension, EventEnvelope, EventRecord};
use trailwatch_nats::{EventQueue, QueueMessage};
use trailwatch_s3::ObjectStore;

use crate::domain::{AllowListGate, DispatchService, TacticalService, WorkerError};

/// One worker's control loop: receive an envelope, decode it, settle it, and
/// walk its records through gate → fetch → transcribe → handler. Errors stay
/// inside the loop; only cancellation ends it.
pub struct WorkerLoop {
    queue: Arc<dyn EventQueue>,
    store: Arc<dyn ObjectStore>,
    transcriber: Arc<dyn Transcriber>,
    gate: Arc<AllowListGate>,
    dispatch: Arc<DispatchService>,
    tactical: Arc<TacticalService>,
    dispatch_talkgroup: String,
    worker_timeout: Duration,
}

impl WorkerLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<dyn EventQueue>,
        store: Arc<dyn ObjectStore>,
        transcriber: Arc<dyn Transcriber>,
        gate: Arc<AllowListGate>,
        dispatch: Arc<DispatchService>,
        tactical: Arc<TacticalService>,
        dispatch_talkgroup: String,
        worker_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            store,
            transcriber,
            gate,
            dispatch,
            tactical,
            dispatch_talkgroup,
            worker_timeout,
        }
    }

    pub async fn run(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        info!("worker started");

        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => break,
                received = self.queue.receive() => match received {
                    Ok(Some(message)) => message,
                    Ok(None) => continue,
                    Err(e) => {
                        error!(error = %e, "failed to receive message");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                }
            };

            self.handle_message(&cancel, message.as_ref()).await;
        }

        info!("worker stopped");
        Ok(())
    }

    /// Settle and process one envelope. Acked after it decodes to a non-empty
    /// record list and before the records run: a redelivered envelope would
    /// refetch and re-transcribe the same objects and duplicate chat posts,
    /// so record-level failures are logged and dropped instead.
    pub async fn handle_message(&self, cancel: &CancellationToken, message: &dyn QueueMessage) {
        let envelope: EventEnvelope = match serde_json::from_slice(&message.payload()) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(error = %e, "failed to decode event envelope");
                if let Err(nack_err) = message.nack().await {
                    error!(error = %nack_err, "failed to nack message");
                }
                return;
            }
        };

        if envelope.records.is_empty() {
            debug!("envelope has no records");
            if let Err(e) = message.ack().await {
                error!(error = %e, "failed to acknowledge message");
            }
            return;
        }

        if let Err(e) = message.ack().await {
            error!(error = %e, "failed to acknowledge message");
        }

        let mut seen = HashSet::new();
        let work = async {
            for record in &envelope.records {
                self.process_record(cancel, record, &mut seen).await;
            }
        };

        if tokio::time::timeout(self.worker_timeout, work).await.is_err() {
            warn!(
                timeout = ?self.worker_timeout,
                "envelope processing exceeded worker timeout, dropping remaining records"
            );
        }
    }

    async fn process_record(
        &self,
        cancel: &CancellationToken,
        record: &EventRecord,
        seen: &mut HashSet<u64>,
    ) {
        if !record.is_object_created() {
            debug!(event_name = %record.event_name, "skipping non-object-created event");
            return;
        }

        let key = &record.s3.object.key;
        if !has_wav_extension(key) {
            debug!(key = %key, "skipping non-wav file");
            return;
        }

        debug!(key = %key, "processing recording");

        let (allowed, parsed_key) = match self.gate.is_object_allowed(key).await {
            Ok(result) => result,
            Err(WorkerError::Key(e)) => {
                warn!(error = %e, key = %key, "failed to parse key");
                return;
            }
            Err(e) => {
                error!(error = %e, key = %key, "failed to check if object is allowed");
                return;
            }
        };
        if !allowed {
            debug!(key = %key, "object not allowed");
            return;
        }

        let audio = match self.store.get(key).await {
            Ok(audio) => audio,
            Err(e) => {
                error!(error = %e, key = %key, "failed to fetch recording");
                return;
            }
        };

        let transcription = match self.transcriber.transcribe(key, audio).await {
            Ok(transcription) => transcription,
            Err(e) => {
                error!(error = %e, key = %key, "failed to transcribe recording");
                return;
            }
        };

        info!(key = %key, transcription = %transcription.transcription, "transcription completed");

        let result = if parsed_key.key.talkgroup == self.dispatch_talkgroup {
            self.dispatch
                .process_dispatch_call(cancel, &parsed_key, &transcription, seen)
                .await
        } else {
            self.tactical
                .process_tactical_call(cancel, &parsed_key, &transcription)
                .await
        };

        match result {
            Ok(()) => {}
            Err(WorkerError::NoThreadRoot(talkgroup)) => {
                debug!(talkgroup = %talkgroup, key = %key, "no live thread for talkgroup");
            }
            Err(WorkerError::Cancelled) => {
                debug!(key = %key, "record processing cancelled");
            }
            Err(e) => {
                error!(error = %e, key = %key, "failed to process record");
            }
        }
    }
}
