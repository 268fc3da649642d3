use crate::constants::{defaults, endpoints};
use crate::error::LlmError;
use crate::llm::traits::*;
use crate::llm::{LmStudioClient, OllamaClient};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Identifies which local inference server we talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    #[serde(alias = "lm_studio")]
    LmStudio,
}

impl ProviderKind {
    pub fn name(&self) -> &str {
        match self {
            Self::Ollama => "ollama",
            Self::LmStudio => "lmstudio",
        }
    }

    pub fn default_base_url(&self) -> &str {
        match self {
            Self::Ollama => endpoints::OLLAMA_BASE_URL,
            Self::LmStudio => endpoints::LMSTUDIO_BASE_URL,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "lmstudio" | "lm_studio" | "lm-studio" => Ok(Self::LmStudio),
            other => Err(LlmError::Config(format!(
                "Unknown provider '{other}' (expected 'ollama' or 'lmstudio')"
            ))),
        }
    }
}

/// Network location of the inference server plus the per-call timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub base_url: String,
    pub timeout: Duration,
}

impl ProviderEndpoint {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn default_for(kind: ProviderKind) -> Self {
        Self::new(
            kind.default_base_url(),
            Duration::from_secs(defaults::TIMEOUT_SECS),
        )
    }
}

/// The provider chosen at startup. Dispatches to the concrete client.
pub enum LocalProvider {
    Ollama(OllamaClient),
    LmStudio(LmStudioClient),
}

impl LocalProvider {
    pub fn build(kind: ProviderKind, endpoint: &ProviderEndpoint) -> Result<Self, LlmError> {
        match kind {
            ProviderKind::Ollama => Ok(Self::Ollama(OllamaClient::new(endpoint)?)),
            ProviderKind::LmStudio => Ok(Self::LmStudio(LmStudioClient::new(endpoint)?)),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Ollama(_) => ProviderKind::Ollama,
            Self::LmStudio(_) => ProviderKind::LmStudio,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            Self::Ollama(c) => c.base_url(),
            Self::LmStudio(c) => c.base_url(),
        }
    }
}

#[async_trait::async_trait]
impl ProviderClient for LocalProvider {
    fn label(&self) -> &str {
        match self {
            Self::Ollama(c) => c.label(),
            Self::LmStudio(c) => c.label(),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        match self {
            Self::Ollama(c) => c.list_models().await,
            Self::LmStudio(c) => c.list_models().await,
        }
    }

    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, LlmError> {
        match self {
            Self::Ollama(c) => c.embed(model, text).await,
            Self::LmStudio(c) => c.embed(model, text).await,
        }
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        match self {
            Self::Ollama(c) => c.generate(model, prompt, max_tokens, temperature).await,
            Self::LmStudio(c) => c.generate(model, prompt, max_tokens, temperature).await,
        }
    }
}
