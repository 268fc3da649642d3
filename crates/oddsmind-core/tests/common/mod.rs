#![allow(dead_code)]

use oddsmind_core::{LlmError, ProviderClient};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the stub's `list_models` does next.
#[derive(Debug, Clone)]
pub enum Catalog {
    Models(Vec<String>),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCall {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Recording provider. Embeddings are derived from the input text unless a
/// fixed vector is registered for it.
pub struct StubProvider {
    catalog: Mutex<Catalog>,
    fixed_embeddings: Mutex<HashMap<String, Vec<f32>>>,
    failing_text: Mutex<Option<String>>,
    reply: Mutex<String>,
    list_delay: Mutex<Duration>,
    embed_delay: Mutex<Duration>,
    generate_delay: Mutex<Duration>,
    list_calls: AtomicUsize,
    embed_calls: Mutex<Vec<(String, String)>>,
    generate_calls: Mutex<Vec<GenerateCall>>,
}

impl StubProvider {
    pub fn new(models: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            catalog: Mutex::new(Catalog::Models(ids(models))),
            fixed_embeddings: Mutex::new(HashMap::new()),
            failing_text: Mutex::new(None),
            reply: Mutex::new("OK".to_string()),
            list_delay: Mutex::new(Duration::ZERO),
            embed_delay: Mutex::new(Duration::ZERO),
            generate_delay: Mutex::new(Duration::ZERO),
            list_calls: AtomicUsize::new(0),
            embed_calls: Mutex::new(Vec::new()),
            generate_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_models(&self, models: &[&str]) {
        *self.catalog.lock().unwrap() = Catalog::Models(ids(models));
    }

    pub fn set_unavailable(&self) {
        *self.catalog.lock().unwrap() = Catalog::Unavailable;
    }

    pub fn set_embedding(&self, text: &str, vector: Vec<f32>) {
        self.fixed_embeddings
            .lock()
            .unwrap()
            .insert(text.to_string(), vector);
    }

    pub fn fail_on(&self, text: &str) {
        *self.failing_text.lock().unwrap() = Some(text.to_string());
    }

    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = reply.to_string();
    }

    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = delay;
    }

    pub fn set_embed_delay(&self, delay: Duration) {
        *self.embed_delay.lock().unwrap() = delay;
    }

    pub fn set_generate_delay(&self, delay: Duration) {
        *self.generate_delay.lock().unwrap() = delay;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn embed_calls(&self) -> Vec<(String, String)> {
        self.embed_calls.lock().unwrap().clone()
    }

    pub fn generate_calls(&self) -> Vec<GenerateCall> {
        self.generate_calls.lock().unwrap().clone()
    }
}

/// Deterministic stand-in for a real embedding: length and byte sum.
pub fn fake_embedding(text: &str) -> Vec<f32> {
    let sum: u32 = text.bytes().map(u32::from).sum();
    vec![text.len() as f32, sum as f32]
}

pub fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait::async_trait]
impl ProviderClient for StubProvider {
    fn label(&self) -> &str {
        "stub"
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().unwrap();
        pause(delay).await;
        let catalog = self.catalog.lock().unwrap().clone();
        match catalog {
            Catalog::Models(models) => Ok(models),
            Catalog::Unavailable => Err(LlmError::ProviderUnavailable("connection refused".into())),
        }
    }

    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, LlmError> {
        self.embed_calls
            .lock()
            .unwrap()
            .push((model.to_string(), text.to_string()));
        let delay = *self.embed_delay.lock().unwrap();
        pause(delay).await;

        if self.failing_text.lock().unwrap().as_deref() == Some(text) {
            return Err(LlmError::ProviderUnavailable("embed failed".into()));
        }
        let fixed = self.fixed_embeddings.lock().unwrap().get(text).cloned();
        Ok(fixed.unwrap_or_else(|| fake_embedding(text)))
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.generate_calls.lock().unwrap().push(GenerateCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            max_tokens,
            temperature,
        });
        let delay = *self.generate_delay.lock().unwrap();
        pause(delay).await;
        let reply = self.reply.lock().unwrap().clone();
        Ok(reply)
    }
}
