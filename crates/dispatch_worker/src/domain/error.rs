use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("failed to parse object key: {0}")]
    Key(#[from] trailwatch_domain::DomainError),

    #[error("no talkgroup known for {0}")]
    UnknownTalkgroup(String),

    #[error("no talkgroup known for tac channel {0}")]
    UnknownTacChannel(String),

    #[error("unexpected membership result count for talkgroup {talkgroup}: {count}")]
    MembershipArity { talkgroup: String, count: usize },

    #[error("kv store error: {0}")]
    Kv(#[from] trailwatch_kv::KvError),

    #[error("chat error: {0}")]
    Chat(#[from] trailwatch_chat::ChatError),

    #[error("dispatch parse error: {0}")]
    Ml(#[from] trailwatch_ml::MlError),

    /// Expected before a talkgroup is activated; handled as a quiet skip.
    #[error("no live thread for talkgroup {0}")]
    NoThreadRoot(String),

    #[error("cancelled")]
    Cancelled,
}

pub type WorkerResult<T> = Result<T, WorkerError>;
