use clap::Parser;
use oddsmind_cli::commands::{context_from_pairs, parse_feature, parse_pair, render_status};
use oddsmind_cli::{run, Cli, Command};
use oddsmind_core::config::Settings;
use oddsmind_core::{EngineOptions, EngineStatus, LlmError, ProviderClient, ProviderKind, RoutingEngine};
use std::sync::Mutex;

// ========================================================================
// Argument parsing
// ========================================================================

#[test]
fn test_parse_prop_bet_with_negative_odds() {
    let cli = Cli::try_parse_from([
        "oddsmind", "prop-bet", "--player", "LeBron", "--stat", "points", "--line", "27.5", "--odds",
        "-110", "--context", "opponent=Celtics",
    ])
    .unwrap();

    match cli.command {
        Command::PropBet {
            player,
            stat,
            line,
            odds,
            context,
        } => {
            assert_eq!(player, "LeBron");
            assert_eq!(stat, "points");
            assert_eq!(line, 27.5);
            assert_eq!(odds, "-110");
            assert_eq!(context, vec![("opponent".to_string(), "Celtics".to_string())]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "oddsmind", "generate", "hello", "--provider", "lmstudio", "--model", "phi-3", "--max-tokens", "32",
    ])
    .unwrap();

    assert_eq!(cli.overrides.provider.as_deref(), Some("lmstudio"));
    assert_eq!(cli.overrides.model.as_deref(), Some("phi-3"));
    assert!(matches!(cli.command, Command::Generate { max_tokens: 32, .. }));
}

#[test]
fn test_embed_requires_text() {
    assert!(Cli::try_parse_from(["oddsmind", "embed"]).is_err());
}

#[test]
fn test_explain_features() {
    let cli = Cli::try_parse_from([
        "oddsmind", "explain", "--prediction", "Over", "--confidence", "64", "--expected-value", "0.05",
        "--feature", "pace=0.3", "--feature", "usage=-0.4",
    ])
    .unwrap();

    match cli.command {
        Command::Explain { features, .. } => {
            assert_eq!(features, vec![("pace".to_string(), 0.3), ("usage".to_string(), -0.4)]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_pair_parsers() {
    assert_eq!(parse_pair("a = b").unwrap(), ("a".to_string(), "b".to_string()));
    assert!(parse_pair("novalue").is_err());
    assert!(parse_pair("=x").is_err());
    assert!(parse_feature("pace=fast").is_err());
    assert!(parse_feature("pace=nan").is_err());
    assert!(parse_feature("pace=inf").is_err());
}

#[test]
fn test_context_values_keep_json_types() {
    let context = context_from_pairs(&[
        ("minutes".to_string(), "36".to_string()),
        ("venue".to_string(), "away".to_string()),
        ("injured".to_string(), "false".to_string()),
    ]);
    assert_eq!(context.render(), "minutes: 36\nvenue: away\ninjured: false\n");
}

#[test]
fn test_overrides_apply_to_settings() {
    let cli = Cli::try_parse_from([
        "oddsmind", "models", "--provider", "lmstudio", "--base-url", "http://box:1234", "--timeout", "9",
    ])
    .unwrap();
    let mut settings = Settings::default();

    cli.overrides.apply(&mut settings).unwrap();

    assert_eq!(settings.local_llm.provider, ProviderKind::LmStudio);
    assert_eq!(settings.local_llm.base_url(), "http://box:1234");
    assert_eq!(settings.local_llm.timeout_secs, 9);
}

#[test]
fn test_render_status_without_models() {
    let status = EngineStatus {
        provider: "ollama".into(),
        models: vec![],
        embed_model: None,
        generation_model: None,
        default_model: None,
        refreshed_at: None,
        stale: true,
    };
    let text = render_status(&status);
    assert!(text.contains("Discovered: never"));
    assert!(text.contains("Models: none loaded"));
    assert!(text.contains("Generation model: -"));
}

// ========================================================================
// Command execution
// ========================================================================

struct CannedProvider {
    prompts: Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl ProviderClient for CannedProvider {
    fn label(&self) -> &str {
        "canned"
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(vec!["gte-embed".to_string(), "llama-chat".to_string()])
    }

    async fn embed(&self, _model: &str, text: &str) -> Result<Vec<f32>, LlmError> {
        Ok(vec![text.len() as f32])
    }

    async fn generate(&self, model: &str, prompt: &str, _max: u32, _temp: f32) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));
        Ok("canned reply".to_string())
    }
}

fn canned_engine() -> RoutingEngine<CannedProvider> {
    RoutingEngine::new(
        CannedProvider {
            prompts: Mutex::new(Vec::new()),
        },
        EngineOptions::default(),
    )
}

#[tokio::test]
async fn test_run_models_lists_assignment() {
    let engine = canned_engine();

    let output = run(&Command::Models, None, &engine).await.unwrap();

    assert!(output.contains("Provider: canned"));
    assert!(output.contains("  gte-embed"));
    assert!(output.contains("Embed model: gte-embed"));
    assert!(output.contains("Generation model: llama-chat"));
}

#[tokio::test]
async fn test_run_embed_prints_json() {
    let engine = canned_engine();
    let command = Command::Embed {
        texts: vec!["ab".into(), "abcd".into()],
    };

    let output = run(&command, None, &engine).await.unwrap();

    assert_eq!(output, "[[2.0],[4.0]]");
}

#[tokio::test]
async fn test_run_with_model_flag_forces_override() {
    let engine = canned_engine();
    let command = Command::Tooltip {
        term: "vig".into(),
        context: None,
    };

    let output = run(&command, Some("gte-embed"), &engine).await.unwrap();

    assert_eq!(output, "canned reply");
    let prompts = engine.provider().prompts.lock().unwrap().clone();
    assert_eq!(prompts[0].0, "gte-embed");
}

#[tokio::test]
async fn test_run_with_unknown_model_fails() {
    let engine = canned_engine();
    let command = Command::Chat {
        message: "hi".into(),
        context: vec![],
    };

    let err = run(&command, Some("ghost"), &engine).await.unwrap_err();

    assert!(err.to_string().contains("ghost"));
}
