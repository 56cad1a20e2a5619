use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid key format: {0}")]
    KeyFormat(String),

    #[error("invalid time and frequency segment: {0}")]
    TimeFrequencyFormat(String),

    #[error("invalid timestamp: {0}")]
    Timestamp(String),

    #[error("invalid frequency: {0}")]
    Frequency(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
