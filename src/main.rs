//! higgs-serverless: serve the handler over HTTP or run a single event

use anyhow::Context;
use clap::{Parser, Subcommand};
use higgs_audio_serverless::server::{AppState, ServerBuilder};
use higgs_audio_serverless::utils::logging::init_logging;
use higgs_audio_serverless::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "higgs-serverless", version, about)]
struct Cli {
    /// YAML configuration file; defaults and environment variables otherwise
    #[arg(long, short, env = "HIGGS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Run one serverless event from a JSON file and print the output
    Handle {
        /// File holding the event, e.g. {"input": {"transcript": "..."}}
        event: PathBuf,
    },
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Config::from_env().context("loading configuration from environment"),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref()).await?;
    init_logging(&config.logging);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting higgs-serverless {}", higgs_audio_serverless::VERSION);
            ServerBuilder::new()
                .with_config(config)
                .build()
                .context("building server")?
                .start()
                .await
                .context("running server")?;
        }
        Command::Handle { event } => {
            let raw = tokio::fs::read_to_string(&event)
                .await
                .with_context(|| format!("reading event file {}", event.display()))?;
            let event: serde_json::Value =
                serde_json::from_str(&raw).context("parsing event JSON")?;

            let state = AppState::from_config(config).context("wiring handler")?;
            let output = state.handler.handle(&event).await;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
