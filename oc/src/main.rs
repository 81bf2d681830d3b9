//! OpsCopilot - seller analytics copilot
//!
//! CLI entry point: serve the chat API, ask a single question, or inspect the
//! tool catalogue and answer contract.

use std::fs;
use std::path::Path;

use clap::Parser;
use eyre::{Context, Result, eyre};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use opscopilot::agent::{CopilotAgent, relay_interrupts};
use opscopilot::cli::{Cli, Command};
use opscopilot::config::Config;
use opscopilot::output::{self, format_issues};
use opscopilot::server;
use opscopilot::tools::ToolRegistry;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        None => tracing::Level::INFO,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;

    debug!(?level, "Logging initialized");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = dotenvy::dotenv();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => debug!("No .env file"),
        Err(e) => warn!(error = %e, "Failed to read .env"),
    }

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(&config).await
        }
        Command::Ask { question, neighborhood } => cmd_ask(&config, &question, neighborhood).await,
        Command::Tools { neighborhood } => cmd_tools(neighborhood),
        Command::Validate { file } => cmd_validate(&file),
    }
}

async fn cmd_ask(config: &Config, question: &str, neighborhood: bool) -> Result<()> {
    debug!(%neighborhood, "cmd_ask: called");
    config.validate()?;
    let agent = CopilotAgent::from_config(config)?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if relay_interrupts(tokio::signal::ctrl_c, cancel_tx).await {
            std::process::exit(130);
        }
    });

    let reply = agent.run_until(question, neighborhood, cancel_rx).await?;
    info!(
        rounds = reply.rounds,
        tools = ?reply.tools_invoked,
        input_tokens = reply.usage.input_tokens,
        output_tokens = reply.usage.output_tokens,
        "Answer validated"
    );

    println!("{}", serde_json::to_string_pretty(&reply.output)?);
    Ok(())
}

fn cmd_tools(neighborhood: bool) -> Result<()> {
    debug!(%neighborhood, "cmd_tools: called");
    let registry = ToolRegistry::standard();
    for def in registry.list_available(neighborhood) {
        println!("{:<24} {}", def.name, def.description);
    }
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<()> {
    debug!(file = %file.display(), "cmd_validate: called");
    let content = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let candidate: serde_json::Value =
        serde_json::from_str(&content).context(format!("{} is not valid JSON", file.display()))?;

    match output::validate(&candidate) {
        Ok(valid) => {
            println!("{}", serde_json::to_string_pretty(&valid)?);
            Ok(())
        }
        Err(issues) => Err(eyre!("{} failed validation: {}", file.display(), format_issues(&issues))),
    }
}
