use crate::constants::endpoints;
use crate::error::LlmError;
use crate::llm::http::{build_client, join_url, read_json};
use crate::llm::provider::ProviderEndpoint;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

/// Client for an Ollama server through its OpenAI-style `/v1` routes.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(endpoint: &ProviderEndpoint) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_client(endpoint.timeout)?,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[async_trait::async_trait]
impl ProviderClient for OllamaClient {
    fn label(&self) -> &str {
        "ollama"
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = join_url(&self.base_url, endpoints::OLLAMA_MODELS_PATH);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::from_transport("Ollama list models", e))?;

        let body: ModelsResponse = read_json(response, "Ollama list models", None).await?;
        Ok(body.models.into_iter().map(|m| m.name).collect())
    }

    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, LlmError> {
        let url = join_url(&self.base_url, endpoints::OLLAMA_EMBEDDINGS_PATH);
        tracing::debug!("POST {} (model {})", url, model);

        let response = self
            .client
            .post(&url)
            .json(&EmbeddingRequest { model, input: text })
            .send()
            .await
            .map_err(|e| LlmError::from_transport("Ollama embed", e))?;

        let body: EmbeddingResponse = read_json(response, "Ollama embed", Some(model)).await?;
        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::ProviderProtocol("Ollama embed: empty data array".into()))
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let url = join_url(&self.base_url, endpoints::OLLAMA_COMPLETIONS_PATH);
        tracing::debug!("POST {} (model {}, max_tokens {})", url, model, max_tokens);

        let request = CompletionRequest {
            model,
            prompt,
            max_tokens,
            temperature,
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport("Ollama generate", e))?;

        let body: CompletionResponse = read_json(response, "Ollama generate", Some(model)).await?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| LlmError::ProviderProtocol("Ollama generate: no choices returned".into()))
    }
}
