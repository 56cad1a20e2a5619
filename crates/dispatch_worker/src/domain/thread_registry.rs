use std::sync::Arc;
use std::time::Duration;

use trailwatch_kv::KvStore;

use crate::domain::error::WorkerResult;

/// Maps an activated talkgroup to the chat thread its traffic is replied
/// into. Entries expire with the activation window; the store is
/// authoritative once the header post has been recorded.
pub struct ThreadRegistry {
    kv: Arc<dyn KvStore>,
}

impl ThreadRegistry {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn key(tgid: &str) -> String {
        format!("tg:{tgid}")
    }

    pub async fn record(&self, tgid: &str, thread_root: &str, ttl: Duration) -> WorkerResult<()> {
        self.kv.set_ex(&Self::key(tgid), ttl, thread_root).await?;
        Ok(())
    }

    /// The live thread root, or `None` when no activation window is open.
    /// An empty stored value counts as missing.
    pub async fn lookup(&self, tgid: &str) -> WorkerResult<Option<String>> {
        match self.kv.get(&Self::key(tgid)).await? {
            Some(thread_root) if !thread_root.is_empty() => Ok(Some(thread_root)),
            _ => Ok(None),
        }
    }
}
