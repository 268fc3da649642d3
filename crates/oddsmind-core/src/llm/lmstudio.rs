use crate::constants::endpoints;
use crate::error::LlmError;
use crate::llm::http::{build_client, join_url, read_json};
use crate::llm::provider::ProviderEndpoint;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

/// Client for an LM Studio style server.
///
/// `/embed` accepts a batch, but this client always sends exactly one text so
/// it stays interchangeable with [`super::OllamaClient`].
pub struct LmStudioClient {
    client: reqwest::Client,
    base_url: String,
}

impl LmStudioClient {
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

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

#[async_trait::async_trait]
impl ProviderClient for LmStudioClient {
    fn label(&self) -> &str {
        "lmstudio"
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = join_url(&self.base_url, endpoints::LMSTUDIO_MODELS_PATH);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::from_transport("LM Studio list models", e))?;

        read_json(response, "LM Studio list models", None).await
    }

    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, LlmError> {
        // The /embed route serves whatever embedding model is loaded; the id is
        // only used to recognise "model missing" failures.
        let url = join_url(&self.base_url, endpoints::LMSTUDIO_EMBED_PATH);
        tracing::debug!("POST {} (model {})", url, model);

        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest { texts: [text] })
            .send()
            .await
            .map_err(|e| LlmError::from_transport("LM Studio embed", e))?;

        let body: EmbedResponse = read_json(response, "LM Studio embed", Some(model)).await?;
        body.embeddings
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ProviderProtocol("LM Studio embed: empty embeddings array".into()))
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let url = join_url(&self.base_url, endpoints::LMSTUDIO_GENERATE_PATH);
        tracing::debug!("POST {} (model {}, max_tokens {})", url, model, max_tokens);

        let request = GenerateRequest {
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
            .map_err(|e| LlmError::from_transport("LM Studio generate", e))?;

        let body: GenerateResponse = read_json(response, "LM Studio generate", Some(model)).await?;
        Ok(body.text)
    }
}
