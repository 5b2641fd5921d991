//! Command-line interface for tictac.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rewindable tic-tac-toe with saved games
#[derive(Parser, Debug)]
#[command(name = "tictac")]
#[command(about = "Rewindable tic-tac-toe with a REST backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (default: tictac.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST backend
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (created if it doesn't exist)
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Play in the terminal
    Play {
        /// API root of the backend
        #[arg(long)]
        api_url: Option<String>,

        /// Keep saved games in memory instead of talking to a backend
        #[arg(long)]
        offline: bool,
    },
}
