//! Prompt templates for the betting assistant helpers. Pure string building.

use crate::assist::{PredictionRecord, PromptContext};

pub fn prop_bet_prompt(
    player: &str,
    stat: &str,
    line: f64,
    odds: &str,
    context: Option<&PromptContext>,
) -> String {
    let mut prompt = String::from(
        "You are a sports betting analyst. Evaluate the following player prop bet.\n\n",
    );
    prompt.push_str(&format!("Player: {player}\n"));
    prompt.push_str(&format!("Stat: {stat}\n"));
    prompt.push_str(&format!("Line: {line}\n"));
    prompt.push_str(&format!("Odds: {odds}\n"));
    push_context(&mut prompt, context);
    prompt.push_str(
        "\nRecommend over, under or pass in one line, then give the two strongest reasons \
         and the main risk.",
    );
    prompt
}

pub fn confidence_prompt(record: &PredictionRecord, features: Option<&[(String, f64)]>) -> String {
    let mut prompt = String::from(
        "Explain to a bettor, in two or three plain sentences, why the model holds this \
         level of confidence.\n\n",
    );
    prompt.push_str(&format!("Prediction: {}\n", record.prediction));
    prompt.push_str(&format!("Confidence: {}%\n", record.confidence));
    prompt.push_str(&format!("Expected value: {}\n", record.expected_value));

    if let Some(features) = features {
        let top = top_features(features, crate::constants::assist::TOP_FEATURES);
        if !top.is_empty() {
            prompt.push_str(&format!("Top factors: {}\n", format_features(&top)));
        }
    }

    prompt.push_str("\nAvoid jargon and do not promise outcomes.");
    prompt
}

pub fn chat_prompt(message: &str, context: Option<&PromptContext>) -> String {
    let mut prompt = String::from(
        "You are Oddsmind, a concise assistant inside a sports betting app. \
         Answer helpfully and encourage responsible play.\n",
    );
    push_context(&mut prompt, context);
    prompt.push_str(&format!("\nUser: {message}\nAssistant:"));
    prompt
}

pub fn tooltip_prompt(term: &str, context: Option<&str>) -> String {
    let mut prompt = format!(
        "Write a single short sentence explaining the betting term \"{term}\" to a casual bettor.\n"
    );
    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!("Context: {context}\n"));
    }
    prompt.push_str("Tooltip:");
    prompt
}

/// The `n` largest contributions by magnitude. Equal magnitudes keep their
/// input order; non-finite scores are skipped.
pub fn top_features(features: &[(String, f64)], n: usize) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = features
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    ranked.truncate(n);
    ranked
}

fn format_features(features: &[(&str, f64)]) -> String {
    features
        .iter()
        .map(|(name, score)| format!("{name}: {score:+.3}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_context(prompt: &mut String, context: Option<&PromptContext>) {
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        prompt.push_str("\nContext:\n");
        prompt.push_str(&context.render());
    }
}
