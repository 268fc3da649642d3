use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{defaults, env};
use crate::error::LlmError;
use crate::llm::{EngineOptions, LocalProvider, ProviderEndpoint, ProviderKind, RoutingEngine};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub local_llm: LocalLlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalLlmSettings {
    /// Master switch; when off no engine is built.
    pub enabled: bool,
    pub provider: ProviderKind,
    /// Falls back to the provider's default address.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub batch_size: usize,
    pub model_ttl_secs: u64,
    pub default_model: Option<String>,
}

impl Default for LocalLlmSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ProviderKind::Ollama,
            base_url: None,
            timeout_secs: defaults::TIMEOUT_SECS,
            batch_size: defaults::BATCH_SIZE,
            model_ttl_secs: defaults::MODEL_TTL_SECS,
            default_model: None,
        }
    }
}

impl LocalLlmSettings {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn endpoint(&self) -> ProviderEndpoint {
        ProviderEndpoint::new(self.base_url(), Duration::from_secs(self.timeout_secs))
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            batch_size: self.batch_size,
            ttl: Duration::from_secs(self.model_ttl_secs),
            default_model: self.default_model.clone(),
            ..EngineOptions::default()
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("oddsmind")
            .join("config.toml")
    }

    /// Settings file (or defaults when absent) with environment overrides applied.
    pub fn load() -> Result<Self, LlmError> {
        let mut settings = Self::load_from(&Self::config_path())?;
        settings.apply_env()?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self, LlmError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| LlmError::Config(format!("Failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| LlmError::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    pub fn save(&self) -> Result<(), LlmError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), LlmError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LlmError::Config(format!("Failed to create {}: {e}", parent.display())))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| LlmError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| LlmError::Config(format!("Failed to write {}: {e}", path.display())))?;
        Ok(())
    }

    pub fn apply_env(&mut self) -> Result<(), LlmError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `LOCAL_LLM_*` overrides using `lookup` to read variables.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm = &mut self.local_llm;

        if let Some(value) = lookup(env::ENABLED) {
            llm.enabled = parse_bool(env::ENABLED, &value)?;
        }
        if let Some(value) = lookup(env::PROVIDER) {
            llm.provider = value.parse()?;
        }
        if let Some(value) = lookup(env::BASE_URL).filter(|v| !v.trim().is_empty()) {
            llm.base_url = Some(value);
        }
        if let Some(value) = lookup(env::TIMEOUT) {
            llm.timeout_secs = parse_number(env::TIMEOUT, &value)?;
        }
        if let Some(value) = lookup(env::BATCH_SIZE) {
            llm.batch_size = parse_number(env::BATCH_SIZE, &value)?;
        }
        if let Some(value) = lookup(env::MODEL_TTL) {
            llm.model_ttl_secs = parse_number(env::MODEL_TTL, &value)?;
        }
        if let Some(value) = lookup(env::DEFAULT_MODEL) {
            llm.default_model = Some(value).filter(|v| !v.trim().is_empty());
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), LlmError> {
        let llm = &self.local_llm;
        if llm.timeout_secs == 0 {
            return Err(LlmError::Config("timeout_secs must be a positive integer".into()));
        }
        if llm.batch_size == 0 {
            return Err(LlmError::Config("batch_size must be a positive integer".into()));
        }
        if llm.base_url().trim().is_empty() {
            return Err(LlmError::Config("base_url must not be empty".into()));
        }
        Ok(())
    }

    /// Build and launch the routing engine, or `None` when it is disabled.
    pub fn build_engine(&self) -> Result<Option<Arc<RoutingEngine<LocalProvider>>>, LlmError> {
        if !self.local_llm.enabled {
            tracing::info!("Local LLM engine disabled by settings");
            return Ok(None);
        }
        self.validate()?;

        let llm = &self.local_llm;
        let provider = LocalProvider::build(llm.provider, &llm.endpoint())?;
        tracing::info!("Local LLM engine using {} at {}", llm.provider, llm.base_url());
        Ok(Some(RoutingEngine::launch(provider, llm.engine_options())))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, LlmError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(LlmError::Config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, LlmError> {
    value
        .trim()
        .parse()
        .map_err(|_| LlmError::Config(format!("{key}: expected a non-negative integer, got '{value}'")))
}
