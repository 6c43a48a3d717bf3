//! rota: provider rotation for chat completions
//!
//! Sends each prompt to the highest-priority provider that is configured and
//! not cooling down, failing over to the next one on rate limits and errors.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use rota_core::{ConfigStore, ProviderRegistry, RotationEngine};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("rota=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_store = ConfigStore::new();
    let mut config = config_store.load();
    tracing::debug!(path = %config_store.path().display(), "loaded config");

    let registry = ProviderRegistry::from_config(&config)?;
    config.fill_credentials_from_env(registry.names());
    cli.apply_overrides(&mut config);

    let engine = RotationEngine::new(registry, config);
    let options = cli.chat_options();

    match cli.command {
        None => commands::chat::run(&engine, None, &options).await?,
        Some(Commands::Chat { ref system }) => {
            commands::chat::run(&engine, system.as_deref(), &options).await?
        }
        Some(Commands::Exec {
            ref prompt,
            ref system,
            temperature,
            max_tokens,
            json,
        }) => {
            let exec = commands::exec::ExecOptions {
                system: system.clone(),
                temperature,
                max_tokens,
                json,
            };
            if let Err(err) = commands::exec::run(&engine, prompt, exec, options).await {
                if let Some(exit_err) = err.downcast_ref::<commands::exec::ExecExitError>() {
                    if !json {
                        eprintln!("{}", exit_err.message);
                    }
                    std::process::exit(exit_err.code);
                }
                return Err(err);
            }
        }
        Some(Commands::Providers { json }) => commands::providers::run(&engine, json)?,
    }

    Ok(())
}
