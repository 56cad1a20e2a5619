//! Publishes a synthetic S3 event notification onto the queue, for driving
//! the service by hand against a local stack.

use std::time::Duration;

use clap::Parser;
use trailwatch_domain::{EventEnvelope, EventRecord, S3Bucket, S3Entity, S3Object};
use trailwatch_nats::NatsClient;

#[derive(Debug, Parser)]
#[command(name = "push-message", about = "Publish a test S3 event notification")]
struct Args {
    /// NATS server URL
    #[arg(long, default_value = "nats://localhost:4222", env = "TRAILWATCH_NATS_URL")]
    url: String,

    /// Stream to publish into
    #[arg(long, default_value = "s3_events", env = "TRAILWATCH_NATS_STREAM")]
    stream: String,

    /// Object key for the synthetic record,
    /// e.g. 1399-1750542445_854412500.1-call_1871.wav
    #[arg(long)]
    key: String,

    /// Event name for the record
    #[arg(long, default_value = "ObjectCreated:Put")]
    event_name: String,

    /// Bucket name for the record
    #[arg(long, default_value = "recordings")]
    bucket: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let envelope = EventEnvelope {
        records: vec![EventRecord {
            event_name: args.event_name,
            s3: S3Entity {
                bucket: S3Bucket { name: args.bucket },
                object: S3Object {
                    key: args.key.clone(),
                },
            },
        }],
    };
    let payload = serde_json::to_vec(&envelope)?;

    let client = NatsClient::connect(&args.url, Duration::from_secs(10)).await?;
    client.ensure_stream(&args.stream).await?;
    client
        .publish(&format!("{}.notifications", args.stream), payload.into())
        .await?;

    println!("published {} event for {}", envelope_kind(&envelope), args.key);
    Ok(())
}

fn envelope_kind(envelope: &EventEnvelope) -> &str {
    envelope
        .records
        .first()
        .map(|r| r.event_name.as_str())
        .unwrap_or("empty")
}
