use crate::constants::defaults;
use crate::error::LlmError;
use crate::llm::registry::{ModelRegistry, SelectionPolicy, Task};
use crate::llm::traits::*;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tunables fixed at construction.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Maximum number of embedding inputs grouped per batch.
    pub batch_size: usize,
    /// How long a discovered model list stays fresh. Zero refreshes on every call.
    pub ttl: Duration,
    /// Override to apply once the first discovery has confirmed the model exists.
    pub default_model: Option<String>,
    pub policy: SelectionPolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            batch_size: defaults::BATCH_SIZE,
            ttl: Duration::from_secs(defaults::MODEL_TTL_SECS),
            default_model: None,
            policy: SelectionPolicy::default(),
        }
    }
}

/// Point-in-time view of the engine for status displays.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub provider: String,
    pub models: Vec<String>,
    pub embed_model: Option<String>,
    pub generation_model: Option<String>,
    pub default_model: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub stale: bool,
}

/// Routes embedding and generation requests to the models a local inference
/// server has loaded.
///
/// The registry lives behind an `Arc` that is swapped whole on refresh, so a
/// call that grabbed a snapshot keeps using it even if a refresh lands
/// mid-call. The override is read once per call for the same reason.
pub struct RoutingEngine<P> {
    provider: P,
    options: EngineOptions,
    registry: RwLock<Arc<ModelRegistry>>,
    default_model: RwLock<Option<String>>,
    startup_model: Mutex<Option<String>>,
    /// Serialises discoveries so a burst of stale readers triggers one refresh.
    refresh_gate: tokio::sync::Mutex<()>,
}

impl<P: ProviderClient> RoutingEngine<P> {
    /// Build an engine without starting discovery. The first request refreshes.
    pub fn new(provider: P, mut options: EngineOptions) -> Self {
        options.batch_size = options.batch_size.max(1);
        let startup_model = options.default_model.take();
        Self {
            provider,
            options,
            registry: RwLock::new(Arc::new(ModelRegistry::empty())),
            default_model: RwLock::new(None),
            startup_model: Mutex::new(startup_model),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The snapshot currently installed.
    pub fn registry(&self) -> Arc<ModelRegistry> {
        Arc::clone(&self.registry.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// The active override, if any.
    pub fn default_model(&self) -> Option<String> {
        self.default_model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Query the server's model list and install a new registry.
    pub async fn refresh_models(&self) -> Result<(), LlmError> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await.map(|_| ())
    }

    /// Embed every input, preserving order. Empty input never reaches the server.
    pub async fn embed_text<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
    ) -> Result<Vec<Embedding>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let registry = self.ensure_fresh().await?;
        let model = self.resolve(Task::Embed, &registry)?;

        let mut embeddings = Vec::with_capacity(texts.len());
        for (index, batch) in texts.chunks(self.options.batch_size).enumerate() {
            debug!("Embedding batch {} ({} inputs) with {}", index, batch.len(), model);
            for text in batch {
                embeddings.push(self.provider.embed(&model, text.as_ref()).await?);
            }
        }

        Ok(embeddings)
    }

    /// Generate text with the generation model (or the override).
    pub async fn generate_text(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        if max_tokens == 0 {
            return Err(LlmError::InvalidArgument("max_tokens must be positive".into()));
        }
        if !temperature.is_finite() {
            return Err(LlmError::InvalidArgument(format!(
                "temperature must be finite, got {temperature}"
            )));
        }

        let registry = self.ensure_fresh().await?;
        let model = self.resolve(Task::Generation, &registry)?;
        debug!("Generating with {} (max_tokens {}, temperature {})", model, max_tokens, temperature);

        self.provider
            .generate(&model, prompt, max_tokens, temperature)
            .await
    }

    /// Force every task onto `model`, or clear the override with `None`.
    pub async fn set_default_model(&self, model: Option<&str>) -> Result<(), LlmError> {
        let Some(model) = model else {
            *self.default_model.write().unwrap_or_else(PoisonError::into_inner) = None;
            info!("Default model override cleared");
            return Ok(());
        };

        let registry = self.ensure_fresh().await?;
        if !registry.contains(model) {
            return Err(LlmError::model_unknown(model));
        }

        *self.default_model.write().unwrap_or_else(PoisonError::into_inner) = Some(model.to_string());
        info!("Default model override set to {}", model);
        Ok(())
    }

    /// Describe the current snapshot. Never touches the network.
    pub fn status(&self) -> EngineStatus {
        let registry = self.registry();
        EngineStatus {
            provider: self.provider.label().to_string(),
            models: registry.models().to_vec(),
            embed_model: registry.model_for(Task::Embed).map(str::to_string),
            generation_model: registry.model_for(Task::Generation).map(str::to_string),
            default_model: self.default_model(),
            refreshed_at: registry.refreshed_at_utc(),
            stale: registry.is_stale(self.options.ttl),
        }
    }

    fn resolve(&self, task: Task, registry: &ModelRegistry) -> Result<String, LlmError> {
        if let Some(model) = self.default_model() {
            return Ok(model);
        }
        registry
            .model_for(task)
            .map(str::to_string)
            .ok_or(LlmError::NoSuitableModel { task })
    }

    /// Return a registry fresh enough to serve the current request.
    async fn ensure_fresh(&self) -> Result<Arc<ModelRegistry>, LlmError> {
        let ttl = self.options.ttl;
        let current = self.registry();
        if !current.is_stale(ttl) {
            return Ok(current);
        }

        let _gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while we waited on the gate.
        let current = self.registry();
        if !current.is_stale(ttl) {
            return Ok(current);
        }

        match self.refresh_locked().await {
            Ok(fresh) => Ok(fresh),
            Err(e) if current.is_populated() => {
                warn!(
                    "Model refresh from {} failed, serving stale registry: {}",
                    self.provider.label(),
                    e
                );
                Ok(current)
            }
            Err(e) => Err(e),
        }
    }

    /// Discover and install. Caller must hold the refresh gate.
    async fn refresh_locked(&self) -> Result<Arc<ModelRegistry>, LlmError> {
        let models = self.provider.list_models().await?;
        let registry = Arc::new(ModelRegistry::discovered(models, &self.options.policy));

        info!(
            "Discovered {} model(s) on {} (embed: {}, generation: {})",
            registry.models().len(),
            self.provider.label(),
            registry.model_for(Task::Embed).unwrap_or("-"),
            registry.model_for(Task::Generation).unwrap_or("-"),
        );

        *self.registry.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&registry);
        self.apply_startup_model(&registry);
        Ok(registry)
    }

    fn apply_startup_model(&self, registry: &ModelRegistry) {
        let Some(model) = self
            .startup_model
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };

        if registry.contains(&model) {
            info!("Default model override set to {} from settings", model);
            *self.default_model.write().unwrap_or_else(PoisonError::into_inner) = Some(model);
        } else {
            warn!("Configured default model '{}' is not loaded on the server, ignoring it", model);
        }
    }
}

impl<P: ProviderClient + 'static> RoutingEngine<P> {
    /// Build the engine and kick off the first discovery.
    ///
    /// Inside a tokio runtime the discovery runs as a background task. Outside
    /// one it runs to completion on a temporary runtime before returning.
    /// Failures are logged; the next request retries.
    pub fn launch(provider: P, options: EngineOptions) -> Arc<Self> {
        let engine = Arc::new(Self::new(provider, options));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let background = Arc::clone(&engine);
                // No-op when a request has already refreshed.
                handle.spawn(async move {
                    if let Err(e) = background.ensure_fresh().await {
                        warn!("Initial model discovery failed: {}", e);
                    }
                });
            }
            Err(_) => match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => {
                    if let Err(e) = runtime.block_on(engine.ensure_fresh()) {
                        warn!("Initial model discovery failed: {}", e);
                    }
                }
                Err(e) => warn!("Could not start discovery runtime, deferring to first request: {}", e),
            },
        }

        engine
    }
}
