//! tictac - rewindable tic-tac-toe backend and terminal client.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tictac_app::{GameRepository, ServerSettings, Settings, play};
use tictac_session::{GameService, InMemoryGateway, RestGateway};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.command);
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            host,
            port,
            database_url,
        } => {
            settings.server_mut().override_with(host, port, database_url);
            run_server(settings.server().clone()).await
        }
        Command::Play { api_url, offline } => {
            settings.client_mut().override_with(api_url);
            run_play(settings.client().api_url().clone(), offline).await
        }
    }
}

/// Install the subscriber before anything logs
fn init_tracing(command: &Command) {
    let builder = tracing_subscriber::fmt();
    match command {
        Command::Serve { .. } => builder
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init(),
        // Logs go to stderr so the board on stdout stays readable.
        Command::Play { .. } => builder
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Run the REST backend
#[instrument(skip_all, fields(host = %server.host(), port = server.port()))]
async fn run_server(server: ServerSettings) -> Result<()> {
    info!(database = %server.database_url(), "Starting tictac backend");

    let repo = GameRepository::new(server.database_url().clone())?;
    let migrate = repo.clone();
    tokio::task::spawn_blocking(move || migrate.run_migrations())
        .await
        .context("Migration task panicked")??;

    let listener = tokio::net::TcpListener::bind((server.host().as_str(), *server.port()))
        .await
        .with_context(|| format!("Failed to bind {}:{}", server.host(), server.port()))?;
    tictac_app::serve(listener, repo).await?;
    Ok(())
}

/// Run the terminal front end
#[instrument]
async fn run_play(api_url: String, offline: bool) -> Result<()> {
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let output = std::io::stdout();

    if offline {
        info!("Playing offline");
        let service = GameService::new(InMemoryGateway::new());
        play::run(&service, input, output).await?;
    } else {
        info!(%api_url, "Playing against backend");
        let service = GameService::new(RestGateway::new(api_url));
        play::run(&service, input, output).await?;
    }
    Ok(())
}
