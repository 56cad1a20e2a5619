use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to get object: {0}")]
    Get(String),

    #[error("failed to read object body: {0}")]
    Read(String),

    #[error("object fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Read-only view of the recording bucket.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;
}

/// S3-compatible store. The recorder uploads to a MinIO-style endpoint, so
/// the client pins a custom endpoint, path-style addressing, and static
/// credentials.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    default_timeout: Duration,
}

impl S3ObjectStore {
    pub fn new(
        access_key: &str,
        secret_key: &str,
        endpoint: &str,
        region: &str,
        bucket: &str,
        default_timeout: Duration,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "trailwatch");

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: bucket.to_string(),
            default_timeout,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        debug!(key, bucket = %self.bucket, "fetching object");

        let fetch = async {
            let object = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| StoreError::Get(e.to_string()))?;

            let body = object
                .body
                .collect()
                .await
                .map_err(|e| StoreError::Read(e.to_string()))?;

            Ok(body.into_bytes().to_vec())
        };

        match tokio::time::timeout(self.default_timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.default_timeout)),
        }
    }
}
