use anyhow::{bail, Result};
use clap::Parser;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = oddsmind_core::Settings::load()?;
    cli.overrides.apply(&mut settings)?;
    tracing::debug!("Effective settings: {:?}", settings.local_llm);

    let Some(engine) = settings.build_engine()? else {
        bail!(
            "The local LLM engine is disabled (set LOCAL_LLM_ENABLED=true or enable it in {})",
            oddsmind_core::Settings::config_path().display()
        );
    };

    let output = commands::run(&cli.command, cli.overrides.model.as_deref(), engine.as_ref()).await?;
    println!("{output}");

    Ok(())
}
