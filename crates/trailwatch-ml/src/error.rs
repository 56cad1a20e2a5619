use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("failed to send model request: {0}")]
    Request(String),

    #[error("model endpoint returned status {0}")]
    Status(u16),

    #[error("failed to decode model response: {0}")]
    Decode(String),

    #[error("model returned no content")]
    Empty,
}
