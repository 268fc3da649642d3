use crate::llm::Task;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Provider protocol error: {0}")]
    ProviderProtocol(String),

    #[error("Unknown model: {model}")]
    ModelUnknown { model: String },

    #[error("No suitable model for task '{task}'")]
    NoSuitableModel { task: Task },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    pub fn model_unknown(model: impl Into<String>) -> Self {
        Self::ModelUnknown {
            model: model.into(),
        }
    }

    /// Map a transport-level failure onto the taxonomy. Body decoding failures
    /// mean the server answered with something we cannot read.
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ProviderProtocol(format!("{context}: {err}"))
        } else {
            Self::ProviderUnavailable(format!("{context}: {err}"))
        }
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
