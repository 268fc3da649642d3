use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use oddsmind_core::config::Settings;
use oddsmind_core::{EngineStatus, PredictionRecord, PromptContext, ProviderClient, RoutingEngine};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "oddsmind")]
#[command(about = "Oddsmind - local LLM routing for the betting assistant")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override the settings file and environment.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Inference server kind (ollama, lmstudio)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Inference server base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Force this model for every request
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover models and show the task assignment
    Models,
    /// Embed one or more texts and print the vectors as JSON
    Embed {
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Run a raw completion
    Generate {
        prompt: String,
        #[arg(long, default_value_t = 256)]
        max_tokens: u32,
        #[arg(long, default_value_t = 0.7)]
        temperature: f32,
    },
    /// Analyze a player prop bet
    PropBet {
        #[arg(long)]
        player: String,
        #[arg(long)]
        stat: String,
        #[arg(long, allow_negative_numbers = true)]
        line: f64,
        #[arg(long, allow_hyphen_values = true)]
        odds: String,
        /// Extra context as key=value (repeatable)
        #[arg(long = "context", value_parser = parse_pair)]
        context: Vec<(String, String)>,
    },
    /// Explain a prediction's confidence
    Explain {
        #[arg(long)]
        prediction: String,
        #[arg(long)]
        confidence: f64,
        #[arg(long, allow_negative_numbers = true)]
        expected_value: f64,
        /// Feature contribution as name=score (repeatable)
        #[arg(long = "feature", value_parser = parse_feature, allow_hyphen_values = true)]
        features: Vec<(String, f64)>,
    },
    /// Conversational reply
    Chat {
        message: String,
        #[arg(long = "context", value_parser = parse_pair)]
        context: Vec<(String, String)>,
    },
    /// Short tooltip text for a betting term
    Tooltip {
        term: String,
        #[arg(long)]
        context: Option<String>,
    },
}

impl Overrides {
    /// Fold the connection flags into `settings`. `--model` is applied to the
    /// engine later because it has to be validated against the server.
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        let llm = &mut settings.local_llm;
        if let Some(ref provider) = self.provider {
            llm.provider = provider.parse()?;
        }
        if let Some(ref base_url) = self.base_url {
            llm.base_url = Some(base_url.clone());
        }
        if let Some(timeout) = self.timeout {
            llm.timeout_secs = timeout;
        }
        Ok(())
    }
}

pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

pub fn parse_feature(raw: &str) -> Result<(String, f64), String> {
    let (name, score) = parse_pair(raw)?;
    let score = score
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("feature score must be a finite number, got '{score}'"))?;
    Ok((name, score))
}

/// Values that parse as JSON (numbers, booleans, arrays) keep their type;
/// anything else is a string.
pub fn context_from_pairs(pairs: &[(String, String)]) -> PromptContext {
    pairs
        .iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            (key.clone(), value)
        })
        .collect()
}

pub fn render_status(status: &EngineStatus) -> String {
    let mut out = format!("Provider: {}\n", status.provider);
    match status.refreshed_at {
        Some(at) => out.push_str(&format!("Discovered: {}\n", at.format("%Y-%m-%d %H:%M:%S UTC"))),
        None => out.push_str("Discovered: never\n"),
    }

    if status.models.is_empty() {
        out.push_str("Models: none loaded\n");
    } else {
        out.push_str("Models:\n");
        for model in &status.models {
            out.push_str(&format!("  {model}\n"));
        }
    }

    let or_dash = |m: &Option<String>| m.clone().unwrap_or_else(|| "-".to_string());
    out.push_str(&format!("Embed model: {}\n", or_dash(&status.embed_model)));
    out.push_str(&format!("Generation model: {}\n", or_dash(&status.generation_model)));
    out.push_str(&format!("Override: {}", or_dash(&status.default_model)));
    out
}

/// Execute one command against `engine` and return what should be printed.
pub async fn run<P: ProviderClient>(
    command: &Command,
    model: Option<&str>,
    engine: &RoutingEngine<P>,
) -> Result<String> {
    if let Some(model) = model {
        engine
            .set_default_model(Some(model))
            .await
            .with_context(|| format!("cannot use model '{model}'"))?;
    }

    let output = match command {
        Command::Models => {
            engine.refresh_models().await?;
            render_status(&engine.status())
        }
        Command::Embed { texts } => {
            let vectors = engine.embed_text(texts.as_slice()).await?;
            serde_json::to_string(&vectors)?
        }
        Command::Generate {
            prompt,
            max_tokens,
            temperature,
        } => engine.generate_text(prompt, *max_tokens, *temperature).await?,
        Command::PropBet {
            player,
            stat,
            line,
            odds,
            context,
        } => {
            let context = context_from_pairs(context);
            engine
                .analyze_prop_bet(player, stat, *line, odds, Some(&context))
                .await?
        }
        Command::Explain {
            prediction,
            confidence,
            expected_value,
            features,
        } => {
            let record = PredictionRecord {
                prediction: prediction.clone(),
                confidence: *confidence,
                expected_value: *expected_value,
            };
            let features = (!features.is_empty()).then_some(features.as_slice());
            engine.explain_prediction_confidence(&record, features).await?
        }
        Command::Chat { message, context } => {
            let context = context_from_pairs(context);
            engine.chat_response(message, Some(&context)).await?
        }
        Command::Tooltip { term, context } => {
            engine.tooltip_explanation(term, context.as_deref()).await?
        }
    };

    Ok(output)
}
