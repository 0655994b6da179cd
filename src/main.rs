//! # Agency Dashboard Entry Point

use anyhow::Context;
use clap::{Parser, Subcommand};

use agency_dashboard::{config::ConfigLoader, db, server::run_server, telemetry};

#[derive(Debug, Parser)]
#[command(name = "agency-dashboard", version, about = "Agency dashboard API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    telemetry::init_tracing(&config).context("initializing telemetry")?;

    tracing::info!(profile = %config.profile, "loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "effective configuration");
    }

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Migrate => db::run_migrations(&db).await,
        Command::Serve => {
            db::run_migrations(&db).await?;
            run_server(config, db).await
        }
    }
}
