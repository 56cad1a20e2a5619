use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KvError {
    #[error("kv command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("kv command timed out after {0:?}")]
    Timeout(Duration),
}
