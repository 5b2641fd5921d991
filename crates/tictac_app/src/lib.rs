//! Backend and terminal front end for rewindable tic-tac-toe.
//!
//! # Architecture
//!
//! - **Database**: diesel repository over SQLite ([`GameRepository`])
//! - **Server**: axum router serving `/api/games` ([`router`], [`serve`])
//! - **Front end**: line-based terminal client ([`play::run`])
//! - **Config**: `tictac.toml` plus environment overrides ([`Settings`])

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
pub mod play;
mod server;

pub use config::{
    API_URL_VAR, ClientSettings, ConfigError, DATABASE_URL_VAR, DEFAULT_CONFIG_FILE,
    ServerSettings, Settings,
};
pub use db::{DbError, GameRepository};
pub use server::{router, serve};
