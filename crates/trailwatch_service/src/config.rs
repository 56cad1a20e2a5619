use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Service configuration, loaded from `TRAILWATCH_`-prefixed environment
/// variables with defaults matching a local development stack.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // OpenTelemetry configuration
    /// Enable OTLP export for traces and logs
    #[serde(default = "default_otel_enabled")]
    pub otel_enabled: bool,

    /// OTLP endpoint (gRPC)
    #[serde(default = "default_otel_endpoint")]
    pub otel_endpoint: String,

    /// Service name reported in telemetry
    #[serde(default = "default_otel_service_name")]
    pub otel_service_name: String,

    // Queue configuration
    /// NATS server URL
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// JetStream stream carrying S3 event notifications
    #[serde(default = "default_nats_stream")]
    pub nats_stream: String,

    /// Subject filter for the shared consumer
    #[serde(default = "default_nats_subject")]
    pub nats_subject: String,

    /// Durable consumer name shared by all workers
    #[serde(default = "default_nats_consumer_name")]
    pub nats_consumer_name: String,

    /// How long a single receive poll waits before coming back empty, seconds
    #[serde(default = "default_nats_poll_wait_secs")]
    pub nats_poll_wait_secs: u64,

    /// Startup timeout for collaborator initialisation, seconds
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    // Object store configuration
    #[serde(default = "default_s3_region")]
    pub s3_region: String,

    #[serde(default)]
    pub s3_access_key: String,

    #[serde(default)]
    pub s3_secret_key: String,

    #[serde(default)]
    pub s3_bucket: String,

    #[serde(default = "default_s3_endpoint")]
    pub s3_endpoint: String,

    /// Timeout for object fetches, seconds
    #[serde(default = "default_s3_timeout_secs")]
    pub s3_timeout_secs: u64,

    // ASR configuration
    #[serde(default = "default_asr_endpoint")]
    pub asr_endpoint: String,

    /// Timeout for transcription requests, seconds
    #[serde(default = "default_asr_timeout_secs")]
    pub asr_timeout_secs: u64,

    // Language model configuration
    /// Which parser backend to use: "ollama" or "openai"
    #[serde(default = "default_ml_backend")]
    pub ml_backend: String,

    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default)]
    pub openai_api_key: String,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Timeout for model requests, seconds
    #[serde(default = "default_ml_timeout_secs")]
    pub ml_timeout_secs: u64,

    // Shared KV store configuration
    /// Redis-protocol URL for the Dragonfly instance
    #[serde(default = "default_kv_url")]
    pub kv_url: String,

    /// Timeout for kv commands, seconds
    #[serde(default = "default_kv_timeout_secs")]
    pub kv_timeout_secs: u64,

    /// How long an activated tactical channel stays admitted, seconds
    #[serde(default = "default_activation_duration_secs")]
    pub activation_duration_secs: u64,

    // Chat configuration
    #[serde(default)]
    pub slack_token: String,

    #[serde(default)]
    pub slack_channel_id: String,

    /// Timeout for chat posts, seconds
    #[serde(default = "default_slack_timeout_secs")]
    pub slack_timeout_secs: u64,

    /// The talkgroup incident assignments are announced on
    #[serde(default = "default_dispatch_talkgroup")]
    pub dispatch_talkgroup: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Per-envelope processing deadline, seconds
    #[serde(default = "default_worker_timeout_secs")]
    pub worker_timeout_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_otel_enabled() -> bool {
    false
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otel_service_name() -> String {
    "trailwatch".to_string()
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_nats_stream() -> String {
    "s3_events".to_string()
}

fn default_nats_subject() -> String {
    "s3_events.*".to_string()
}

fn default_nats_consumer_name() -> String {
    "trailwatch-consumer".to_string()
}

fn default_nats_poll_wait_secs() -> u64 {
    5
}

fn default_startup_timeout_secs() -> u64 {
    30
}

fn default_s3_region() -> String {
    "us-east-1".to_string()
}

fn default_s3_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_s3_timeout_secs() -> u64 {
    10
}

fn default_asr_endpoint() -> String {
    "http://localhost:8080/asr".to_string()
}

fn default_asr_timeout_secs() -> u64 {
    10
}

fn default_ml_backend() -> String {
    "ollama".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ml_timeout_secs() -> u64 {
    15
}

fn default_kv_url() -> String {
    "redis://localhost:6379/0".to_string()
}

fn default_kv_timeout_secs() -> u64 {
    1
}

fn default_activation_duration_secs() -> u64 {
    1800
}

fn default_slack_timeout_secs() -> u64 {
    5
}

fn default_dispatch_talkgroup() -> String {
    "1399".to_string()
}

fn default_worker_count() -> usize {
    5
}

fn default_worker_timeout_secs() -> u64 {
    30
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("TRAILWATCH"))
            .build()?
            .try_deserialize()
    }
}
