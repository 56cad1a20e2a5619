use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;
use trailwatch_asr::Transcriber;
use trailwatch_chat::ChatPoster;
use trailwatch_kv::KvStore;
use trailwatch_ml::DispatchParser;
use trailwatch_nats::EventQueue;
use trailwatch_s3::ObjectStore;

use crate::domain::{AllowListGate, DispatchService, TacticalService, ThreadRegistry};
use crate::worker::WorkerLoop;

pub struct DispatchWorkerConfig {
    pub dispatch_talkgroup: String,
    pub worker_count: usize,
    pub worker_timeout: Duration,
    pub activation_duration: Duration,
}

/// Wires the collaborators into a shared worker loop and hands the runner
/// one process per configured worker.
pub struct DispatchWorker {
    worker: Arc<WorkerLoop>,
    worker_count: usize,
}

impl DispatchWorker {
    pub fn new(
        queue: Arc<dyn EventQueue>,
        store: Arc<dyn ObjectStore>,
        transcriber: Arc<dyn Transcriber>,
        parser: Arc<dyn DispatchParser>,
        chat: Arc<dyn ChatPoster>,
        kv: Arc<dyn KvStore>,
        config: DispatchWorkerConfig,
    ) -> Self {
        info!(workers = config.worker_count, "initializing dispatch worker");

        let gate = Arc::new(AllowListGate::new(
            Arc::clone(&kv),
            config.dispatch_talkgroup.clone(),
        ));
        let threads = Arc::new(ThreadRegistry::new(kv));

        let dispatch = Arc::new(DispatchService::new(
            parser,
            Arc::clone(&chat),
            Arc::clone(&gate),
            Arc::clone(&threads),
            config.dispatch_talkgroup.clone(),
            config.activation_duration,
        ));
        let tactical = Arc::new(TacticalService::new(chat, threads));

        let worker = Arc::new(WorkerLoop::new(
            queue,
            store,
            transcriber,
            gate,
            dispatch,
            tactical,
            config.dispatch_talkgroup,
            config.worker_timeout,
        ));

        Self {
            worker,
            worker_count: config.worker_count,
        }
    }

    pub fn into_runner_processes(
        self,
    ) -> Vec<
        Box<
            dyn FnOnce(
                    CancellationToken,
                ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>
                + Send,
        >,
    > {
        (0..self.worker_count)
            .map(|_| {
                let worker = Arc::clone(&self.worker);
                Box::new(move |ctx: CancellationToken| {
                    Box::pin(async move { worker.run(ctx).await })
                        as Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>
                })
                    as Box<
                        dyn FnOnce(
                                CancellationToken,
                            )
                                -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>
                            + Send,
                    >
            })
            .collect()
    }
}
