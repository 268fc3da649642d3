use crate::error::LlmError;

/// A vector produced by an embedding model. Its length is fixed per model.
pub type Embedding = Vec<f32>;

/// The provider client trait. One implementation per inference server dialect.
///
/// Clients are stateless apart from their endpoint and HTTP pool. They never
/// cache, pick models or batch: the caller passes the model id on every call.
#[async_trait::async_trait]
pub trait ProviderClient: Send + Sync {
    /// Short label used in logs and status output.
    fn label(&self) -> &str;

    /// List model ids in the order the server reports them.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;

    /// Embed a single input string with the given model.
    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, LlmError>;

    /// Run one completion and return the emitted text untouched.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

#[async_trait::async_trait]
impl<T: ProviderClient + ?Sized> ProviderClient for std::sync::Arc<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        (**self).list_models().await
    }

    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, LlmError> {
        (**self).embed(model, text).await
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        (**self).generate(model, prompt, max_tokens, temperature).await
    }
}
