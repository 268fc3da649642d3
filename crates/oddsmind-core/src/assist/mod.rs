//! Betting-assistant helpers layered on [`RoutingEngine::generate_text`].
//!
//! Each helper fills a fixed template and forwards it with its own token and
//! temperature defaults. No retries, no post-processing.

pub mod prompts;

use crate::constants::assist as knobs;
use crate::error::LlmError;
use crate::llm::{ProviderClient, RoutingEngine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered key/value context rendered into prompts as `key: value`
/// lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptContext {
    entries: Vec<(String, Value)>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add an entry, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key}: {s}\n"),
                other => format!("{key}: {other}\n"),
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PromptContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}

/// A model prediction as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub prediction: String,
    /// Percent, 0-100.
    pub confidence: f64,
    pub expected_value: f64,
}

impl<P: ProviderClient> RoutingEngine<P> {
    /// Over/under/pass take on a player prop.
    pub async fn analyze_prop_bet(
        &self,
        player: &str,
        stat: &str,
        line: f64,
        odds: &str,
        context: Option<&PromptContext>,
    ) -> Result<String, LlmError> {
        let prompt = prompts::prop_bet_prompt(player, stat, line, odds, context);
        self.generate_text(&prompt, knobs::PROP_BET_MAX_TOKENS, knobs::PROP_BET_TEMPERATURE)
            .await
    }

    /// Plain-language rationale for a prediction's confidence. When feature
    /// contributions are given, the five largest by magnitude are cited.
    pub async fn explain_prediction_confidence(
        &self,
        record: &PredictionRecord,
        features: Option<&[(String, f64)]>,
    ) -> Result<String, LlmError> {
        let prompt = prompts::confidence_prompt(record, features);
        self.generate_text(&prompt, knobs::CONFIDENCE_MAX_TOKENS, knobs::CONFIDENCE_TEMPERATURE)
            .await
    }

    pub async fn chat_response(
        &self,
        message: &str,
        context: Option<&PromptContext>,
    ) -> Result<String, LlmError> {
        let prompt = prompts::chat_prompt(message, context);
        self.generate_text(&prompt, knobs::CHAT_MAX_TOKENS, knobs::CHAT_TEMPERATURE)
            .await
    }

    pub async fn tooltip_explanation(
        &self,
        term: &str,
        context: Option<&str>,
    ) -> Result<String, LlmError> {
        let prompt = prompts::tooltip_prompt(term, context);
        self.generate_text(&prompt, knobs::TOOLTIP_MAX_TOKENS, knobs::TOOLTIP_TEMPERATURE)
            .await
    }
}
