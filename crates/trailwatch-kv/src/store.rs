use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::info;

use crate::error::KvError;

/// Shared key/value store the workers coordinate through. The allow-list set
/// and the thread-root mappings both live here; nothing is cached in-process.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// `SADDEX`: add members to a set with a per-member TTL, refreshing the
    /// TTL for members already present. Atomic per key.
    async fn sadd_ex(&self, key: &str, ttl: Duration, members: &[String]) -> Result<(), KvError>;

    /// `SMISMEMBER`: one boolean per queried member, in query order.
    async fn smismember(&self, key: &str, members: &[String]) -> Result<Vec<bool>, KvError>;

    /// `SET key value EX ttl`.
    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<(), KvError>;

    /// `GET`; a missing key is `None`, distinct from an empty string.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;
}

/// Dragonfly-backed store. Dragonfly speaks the Redis protocol; `SADDEX` is
/// its extension for per-member set expiry.
pub struct RedisKvStore {
    client: redis::Client,
    default_timeout: Duration,
}

impl RedisKvStore {
    /// Connect and ping so that startup fails fast on a bad address.
    pub async fn connect(url: &str, default_timeout: Duration) -> Result<Self, KvError> {
        let client = redis::Client::open(url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        info!("connected to kv store");

        Ok(Self {
            client,
            default_timeout,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, KvError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    async fn run<T: redis::FromRedisValue>(&self, cmd: redis::Cmd) -> Result<T, KvError> {
        let mut conn = self.connection().await?;
        match tokio::time::timeout(self.default_timeout, cmd.query_async(&mut conn)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(KvError::Timeout(self.default_timeout)),
        }
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn sadd_ex(&self, key: &str, ttl: Duration, members: &[String]) -> Result<(), KvError> {
        let mut cmd = redis::cmd("SADDEX");
        cmd.arg(key).arg(ttl.as_secs());
        for member in members {
            cmd.arg(member);
        }
        self.run::<()>(cmd).await
    }

    async fn smismember(&self, key: &str, members: &[String]) -> Result<Vec<bool>, KvError> {
        let mut cmd = redis::cmd("SMISMEMBER");
        cmd.arg(key);
        for member in members {
            cmd.arg(member);
        }
        self.run(cmd).await
    }

    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<(), KvError> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("EX").arg(ttl.as_secs());
        self.run::<()>(cmd).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.run(cmd).await
    }
}
