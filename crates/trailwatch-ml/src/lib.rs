mod decode;
mod error;
mod ollama;
mod openai;
mod parser;
mod prompt;

pub use error::MlError;
pub use ollama::OllamaDispatchParser;
pub use openai::OpenAiDispatchParser;
pub use parser::DispatchParser;

#[cfg(any(test, feature = "testing"))]
pub use parser::MockDispatchParser;
