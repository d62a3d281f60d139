//! Mnemo HTTP server binary entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mnemo_engine::{MemoryService, MnemoConfig};
use mnemo_server::MemoryServer;

/// Mnemo memory service
#[derive(Debug, Parser)]
#[command(name = "mnemo-server", version, about)]
struct CliArgs {
    /// Path to mnemo.toml, written with defaults if missing; defaults apply
    /// when omitted
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let config = match args.config.as_deref() {
        Some(path) => MnemoConfig::load_or_create(path),
        None => MnemoConfig::load(None),
    }
    .context("loading configuration")?;

    if config.uses_default_api_key() {
        tracing::warn!("Using the default API key; set MNEMO_API_KEY before exposing this server");
    }
    tracing::info!(
        bind = %config.server.bind,
        backup = %config.backup.path.display(),
        "Opening memory stores"
    );

    let service = MemoryService::open(&config).context("opening memory stores")?;
    MemoryServer::new(service, config.server.bind.clone(), config.server.api_key.clone())
        .run()
        .await
        .context("serving HTTP")?;
    Ok(())
}
