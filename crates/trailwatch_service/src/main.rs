mod config;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use config::ServiceConfig;
use dispatch_worker::{DispatchWorker, DispatchWorkerConfig};
use telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig, TelemetryProviders};
use tracing::{error, info};
use trailwatch_asr::{AsrClient, Transcriber};
use trailwatch_chat::{ChatPoster, SlackChatClient};
use trailwatch_kv::{KvStore, RedisKvStore};
use trailwatch_ml::{DispatchParser, OllamaDispatchParser, OpenAiDispatchParser};
use trailwatch_nats::{EventQueue, NatsClient, NatsEventQueue};
use trailwatch_runner::Runner;
use trailwatch_s3::{ObjectStore, S3ObjectStore};

struct Collaborators {
    queue: Arc<dyn EventQueue>,
    store: Arc<dyn ObjectStore>,
    transcriber: Arc<dyn Transcriber>,
    parser: Arc<dyn DispatchParser>,
    chat: Arc<dyn ChatPoster>,
    kv: Arc<dyn KvStore>,
}

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let telemetry_providers: Option<TelemetryProviders> = match init_telemetry(&TelemetryConfig {
        service_name: config.otel_service_name.clone(),
        otel_endpoint: config.otel_endpoint.clone(),
        otel_enabled: config.otel_enabled,
        log_level: config.log_level.clone(),
    }) {
        Ok(providers) => providers,
        Err(e) => {
            eprintln!("failed to initialize telemetry: {e}");
            std::process::exit(1);
        }
    };

    info!(
        workers = config.worker_count,
        dispatch_talkgroup = %config.dispatch_talkgroup,
        "starting trailwatch service"
    );

    let collaborators = match initialize_collaborators(&config).await {
        Ok(collaborators) => collaborators,
        Err(e) => {
            error!(error = %format!("{e:#}"), "failed to initialize collaborators");
            std::process::exit(1);
        }
    };

    let worker = DispatchWorker::new(
        collaborators.queue,
        collaborators.store,
        collaborators.transcriber,
        collaborators.parser,
        collaborators.chat,
        collaborators.kv,
        DispatchWorkerConfig {
            dispatch_talkgroup: config.dispatch_talkgroup.clone(),
            worker_count: config.worker_count,
            worker_timeout: Duration::from_secs(config.worker_timeout_secs),
            activation_duration: Duration::from_secs(config.activation_duration_secs),
        },
    );

    let mut runner = Runner::new();
    for (i, process) in worker.into_runner_processes().into_iter().enumerate() {
        runner = runner.with_process(format!("worker_{i}"), process);
    }

    runner = runner
        .with_closer(move || async move {
            shutdown_telemetry(telemetry_providers);
            Ok(())
        })
        .with_closer_timeout(Duration::from_secs(10));

    runner.run().await;
}

async fn initialize_collaborators(config: &ServiceConfig) -> anyhow::Result<Collaborators> {
    let startup_timeout = Duration::from_secs(config.startup_timeout_secs);

    info!("initializing nats");
    let nats = NatsClient::connect(&config.nats_url, startup_timeout).await?;
    nats.ensure_stream(&config.nats_stream).await?;
    let queue = NatsEventQueue::new(
        nats.jetstream(),
        &config.nats_stream,
        &config.nats_consumer_name,
        &config.nats_subject,
        Duration::from_secs(config.nats_poll_wait_secs),
    )
    .await?;

    let store = S3ObjectStore::new(
        &config.s3_access_key,
        &config.s3_secret_key,
        &config.s3_endpoint,
        &config.s3_region,
        &config.s3_bucket,
        Duration::from_secs(config.s3_timeout_secs),
    );

    let transcriber = AsrClient::new(
        &config.asr_endpoint,
        Duration::from_secs(config.asr_timeout_secs),
    );

    let ml_timeout = Duration::from_secs(config.ml_timeout_secs);
    let parser: Arc<dyn DispatchParser> = match config.ml_backend.as_str() {
        "ollama" => Arc::new(OllamaDispatchParser::new(
            &config.ollama_url,
            &config.ollama_model,
            ml_timeout,
        )),
        "openai" => Arc::new(OpenAiDispatchParser::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.openai_model,
            ml_timeout,
        )),
        other => anyhow::bail!("unknown ml backend: {other}"),
    };

    let chat = SlackChatClient::new(
        &config.slack_token,
        &config.slack_channel_id,
        Duration::from_secs(config.slack_timeout_secs),
    );

    info!("initializing kv store");
    let kv = RedisKvStore::connect(&config.kv_url, Duration::from_secs(config.kv_timeout_secs))
        .await?;

    Ok(Collaborators {
        queue: Arc::new(queue),
        store: Arc::new(store),
        transcriber: Arc::new(transcriber),
        parser,
        chat: Arc::new(chat),
        kv: Arc::new(kv),
    })
}
